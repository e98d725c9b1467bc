//! graph-schema CLI entry point
//!
//! Parses arguments, dispatches the command and exits non-zero on
//! failure. All logic is delegated to the CLI module.

use graph_schema::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
