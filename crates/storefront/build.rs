//! Fingerprints the Sparkcola stylesheet.
//!
//! `static/css/main.css` is copied to `static/css/derived/main.<hash>.css`
//! and the hash is exported as `CSS_HASH` for the `css_hash` template filter.
//! Older fingerprinted copies are removed so the derived directory holds one
//! stylesheet.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

/// Hex digits of the SHA-256 digest kept in the file name.
const FINGERPRINT_LEN: usize = 8;

fn main() -> io::Result<()> {
    let manifest_dir = PathBuf::from(std::env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    let css_dir = manifest_dir.join("static/css");
    let source = css_dir.join("main.css");
    println!("cargo:rerun-if-changed={}", source.display());

    let Ok(stylesheet) = fs::read(&source) else {
        println!("cargo:warning=static/css/main.css not found; pages link an unhashed stylesheet");
        println!("cargo:rustc-env=CSS_HASH=");
        return Ok(());
    };

    let fingerprint = fingerprint(&stylesheet);
    println!("cargo:rustc-env=CSS_HASH={fingerprint}");

    let derived = css_dir.join("derived");
    fs::create_dir_all(&derived)?;
    let target = format!("main.{fingerprint}.css");
    remove_stale(&derived, &target)?;
    fs::write(derived.join(target), stylesheet)
}

fn fingerprint(bytes: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(bytes));
    digest.chars().take(FINGERPRINT_LEN).collect()
}

/// Delete `main.*.css` files other than `keep`.
fn remove_stale(dir: &Path, keep: &str) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name != keep && name.starts_with("main.") && name.ends_with(".css") {
            fs::remove_file(&path)?;
        }
    }
    Ok(())
}
