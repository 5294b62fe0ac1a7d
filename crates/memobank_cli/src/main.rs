//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `memobank_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("memobank_core version={}", memobank_core::core_version());
}
