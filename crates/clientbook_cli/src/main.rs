//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `clientbook_core` linkage and
//!   schema bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use clientbook_core::db::migrations::latest_version;
use clientbook_core::db::open_db_in_memory;

fn main() {
    println!("clientbook_core version={}", clientbook_core::core_version());
    match open_db_in_memory() {
        Ok(_conn) => println!("clientbook_core schema_version={}", latest_version()),
        Err(err) => {
            eprintln!("clientbook_core bootstrap failed: {err}");
            std::process::exit(1);
        }
    }
}
