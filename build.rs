//! Build script - puts the linker script where the linker can find it and,
//! for firmware builds, adds the cortex-m-rt and defmt link scripts.

use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    fs::copy("memory.x", out_dir.join("memory.x")).expect("memory.x is readable");
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Host builds (unit and integration tests) link normally.
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_some() {
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
