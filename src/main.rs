use anyhow::Result;
use clap::Parser;

use docscribe::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Feature-level failures are reported inside the run and still exit 0;
    // only an uncaught top-level error exits non-zero.
    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("[ERROR] Documentation run failed: {e}");
            std::process::exit(1);
        }
    }
}
