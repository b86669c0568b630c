use std::process::Command;

fn main() {
    // Prefer PLOT_COMPAT_VERSION env (set by CI), fall back to git tag, then the package version.
    let version = std::env::var("PLOT_COMPAT_VERSION")
        .ok()
        .filter(|s| !s.is_empty() && s != "dev")
        .or_else(|| {
            Command::new("git")
                .args(["describe", "--tags", "--always"])
                .output()
                .ok()
                .filter(|o| o.status.success())
                .and_then(|o| String::from_utf8(o.stdout).ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
        .unwrap_or_else(|| std::env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "dev".to_string()));

    println!("cargo:rustc-env=PLOT_COMPAT_VERSION={}", version);
    println!("cargo:rerun-if-env-changed=PLOT_COMPAT_VERSION");
}
