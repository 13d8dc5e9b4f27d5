fn main() {
    // Embedded template assets live in static/; git state drives the version label.
    println!("cargo:rerun-if-changed=static/");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let describe = std::process::Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default();

    println!("cargo:rustc-env=LESSON_SITE_GIT_DESCRIBE={describe}");
}
