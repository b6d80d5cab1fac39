//! termshift binary

use analysis_client::ClientError;
use clap::Parser;
use termshift_cli::{run, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // stdout carries the rendered report; logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            match e.downcast_ref::<ClientError>() {
                Some(client_error) => {
                    tracing::error!("{:#}", e);
                    eprintln!("{}", client_error.user_message());
                }
                None => eprintln!("Error: {:#}", e),
            }
            std::process::exit(1);
        }
    }
}
