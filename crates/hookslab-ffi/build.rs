//! Generates `include/hookslab.h` from the exported items.
//!
//! Header generation is skipped on docs.rs (read-only source tree) and a
//! cbindgen failure is reported as a warning so the Rust build still
//! succeeds; the header is a convenience for C consumers.

use std::env;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-changed=cbindgen.toml");
    println!("cargo:rerun-if-env-changed=DOCS_RS");

    if env::var_os("DOCS_RS").is_some() {
        return;
    }

    let crate_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    if let Err(msg) = write_header(&crate_dir) {
        println!("cargo:warning=hookslab.h not generated: {msg}");
    }
}

fn write_header(crate_dir: &Path) -> Result<(), String> {
    let config = cbindgen::Config::from_file(crate_dir.join("cbindgen.toml"))?;
    let include = crate_dir.join("include");
    std::fs::create_dir_all(&include).map_err(|e| format!("{}: {e}", include.display()))?;

    let bindings = cbindgen::Builder::new()
        .with_crate(crate_dir)
        .with_config(config)
        .generate()
        .map_err(|e| e.to_string())?;
    bindings.write_to_file(include.join("hookslab.h"));
    Ok(())
}
