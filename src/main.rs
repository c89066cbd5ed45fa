//! sqlkv entry point
//!
//! All logic is delegated to the CLI module; this only reports fatal errors.

use sqlkv::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
