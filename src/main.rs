//! frontend-scripts - build tooling for front-end applications.
//!
//! This binary resolves the project layout, drives a production build
//! through a bundler adapter and prints the result.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match frontend_scripts::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
