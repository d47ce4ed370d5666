//! chunk-name - Comment-driven chunk naming for dynamic imports
//!
//! ```js
//! const Home = () => import(/* chunkName: "home" */ "./pages/Home.vue");
//! ```
//!
//! `chunk-name build` loads the module graph of a project and prints the chunk
//! every module lands in; `chunk-name scan` only records the annotations.

use anyhow::Result;
use chunk_name::Cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging/tracing system
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chunk_name=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chunk_name=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    cli.execute().await
}
