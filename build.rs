//! Embeds build metadata shown by `taskmate --version`.
//!
//! - `TASKMATE_BUILD_TIMESTAMP`: UTC time of the build
//! - `TASKMATE_GIT_COMMIT`: `git describe` of the checkout, "unknown" outside git

use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let built = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    println!("cargo:rustc-env=TASKMATE_BUILD_TIMESTAMP={}", built);

    let commit = git_describe().unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=TASKMATE_GIT_COMMIT={}", commit);
}

fn git_describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
}
