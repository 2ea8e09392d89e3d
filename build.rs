//! Stamps the build so `/api/health` can say which gateway build is answering.

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!(
        "cargo:rustc-env=GATEWAY_BUILT_AT={}",
        chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ")
    );

    let hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|hash| !hash.is_empty());

    // Source tarballs have no git metadata; health then omits the build field
    if let Some(hash) = hash {
        println!("cargo:rustc-env=GIT_HASH={hash}");
    }
}
