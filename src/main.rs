pub mod config;
pub mod constants;
pub mod errors;
pub mod extractor;
pub mod extractors;
pub mod server;
pub mod telemetry;

use anyhow::Context;

use crate::config::Config;

fn run() -> anyhow::Result<()> {
    let config = Config::load()?;
    telemetry::init_telemetry()?;

    // One runtime thread per configured worker; every request is a task on this pool
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.workers)
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(server::run_server(config))
}

fn main() {
    // Startup and bind failures are fatal; request-level errors never reach here
    if let Err(e) = run() {
        eprintln!("[FATAL ERROR] Server crashed: {}", e);
        eprintln!("[FATAL ERROR] Error chain: {:#}", e);
        std::process::exit(1);
    }
}
