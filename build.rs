//! Build script for detecting system dependencies and providing installation guidance.
//!
//! The core crate is pure Rust. pkg-config and OpenCV are only probed when the
//! `vision` feature is enabled.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if env::var_os("CARGO_FEATURE_VISION").is_some() {
        probe_vision_libraries();
    }

    println!(
        "cargo:rustc-env=BUILD_TARGET={}",
        env::var("TARGET").unwrap_or_default()
    );
    println!("cargo:rustc-env=BUILD_HOST={}", env::var("HOST").unwrap_or_default());
}

/// Trimmed stdout of a successful `pkg-config` invocation
fn pkg_config(args: &[&str]) -> Option<String> {
    let output = Command::new("pkg-config").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn probe_vision_libraries() {
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    let Some(tool) = pkg_config(&["--version"]) else {
        println!("cargo:warning=pkg-config not found; the `vision` feature uses it to locate OpenCV.");
        println!("cargo:warning=Install it with your package manager (apt: pkg-config, brew: pkg-config)");
        return;
    };
    println!("cargo:warning=Using pkg-config {tool}");

    match pkg_config(&["--modversion", "opencv4"]).or_else(|| pkg_config(&["--modversion", "opencv"])) {
        Some(version) => println!("cargo:warning=Found OpenCV {version}"),
        None => {
            println!("cargo:warning=OpenCV not found; the `vision` feature needs it.");
            println!("cargo:warning=apt: libopencv-dev clang libclang-dev, brew: opencv");
            println!("cargo:warning=Without a camera, build without `vision` and pass --replay");
        }
    }
}
