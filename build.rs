fn main() {
    let build_version = chrono::Utc::now().format("%Y.%m.%d-%H%M").to_string();
    println!("cargo:rustc-env=BUILD_VERSION={build_version}");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}
