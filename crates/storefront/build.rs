//! Build script for storefront crate.
//!
//! Hashes static assets so templates can append a content version to their
//! URLs (`/static/css/main.css?v=<hash>`) and browsers refetch on change.

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

/// Assets to hash, with the environment variable that receives each hash.
const ASSETS: &[(&str, &str)] = &[
    ("static/css/main.css", "CSS_HASH"),
    ("static/js/cart.js", "CART_JS_HASH"),
];

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");

    for (relative, var) in ASSETS {
        hash_asset(&Path::new(&manifest_dir).join(relative), var);
    }
}

/// Set `var` to the first 8 hex chars of the file's SHA-256.
fn hash_asset(path: &Path, var: &str) {
    println!("cargo:rerun-if-changed={}", path.display());

    let hash = match fs::read(path) {
        Ok(content) => {
            let digest = format!("{:x}", Sha256::digest(&content));
            digest.chars().take(8).collect::<String>()
        }
        Err(e) => {
            println!("cargo:warning=Could not read {}: {e}", path.display());
            String::new()
        }
    };

    println!("cargo:rustc-env={var}={hash}");
}
