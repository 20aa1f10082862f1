//! Embeds the build time as the firmware's initial clock and, for firmware
//! builds, puts `memory.x` where the linker can find it.

use std::{
    env,
    fs::File,
    io::Write,
    path::PathBuf,
};

fn main() {
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());

    // create rs file with current UTC time
    File::create(out.join("utc.rs"))
        .unwrap()
        .write_fmt(format_args!(
            "const UTC_EPOCH: i64 = {:?};",
            chrono::Utc::now().timestamp()
        ))
        .unwrap();

    // Host builds (tests) need neither the memory layout nor the linker scripts
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    // Put memory layout in the output directory and ensure it's on the linker search path.
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
