// Emits the link directives for the SQIsign static libraries. Nothing is
// linked unless the `link` feature is enabled, so the ABI types stay usable on
// machines without the native library installed.

use std::env;

const DEFAULT_LIB_DIR: &str = "/usr/local/lib/sqisign";

fn main() {
    println!("cargo:rerun-if-env-changed=SQISIGN_LIB_DIR");
    println!("cargo:rerun-if-changed=build.rs");

    if env::var_os("CARGO_FEATURE_LINK").is_none() {
        return;
    }

    let level = if env::var_os("CARGO_FEATURE_LVL5").is_some() {
        "lvl5"
    } else if env::var_os("CARGO_FEATURE_LVL3").is_some() {
        "lvl3"
    } else {
        "lvl1"
    };

    let lib_dir = env::var("SQISIGN_LIB_DIR").unwrap_or_else(|_| DEFAULT_LIB_DIR.to_string());
    println!("cargo:rustc-link-search=native={lib_dir}");

    // Order matters for static archives: dependents before dependencies.
    println!("cargo:rustc-link-lib=static=sqisign_{level}_nistapi");
    for component in [
        "", "_protocols", "_gf", "_id2iso", "_ec", "_klpt", "_precomp",
    ] {
        let name = if component.is_empty() {
            format!("sqisign_{level}")
        } else {
            format!("sqisign{component}_{level}")
        };
        println!("cargo:rustc-link-lib=static={name}");
    }
    for generic in [
        "sqisign_quaternion_generic",
        "sqisign_common_sys",
        "sqisign_intbig_generic",
    ] {
        println!("cargo:rustc-link-lib=static={generic}");
    }
    println!("cargo:rustc-link-lib=gmp");

    println!("cargo:level={level}");
}
