mod data;
mod domain;
mod engine;
mod error;
mod extract;
mod model;
mod server;
mod solver;

use clap::Parser;

/// HTTP service that schedules thesis defenses with an ILP solver.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "127.0.0.1:8000")]
    bind: String,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    server::run(&args.bind).await;
}
