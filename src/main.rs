use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod args;
mod config;
mod dispatcher;
mod event;
mod message;
mod routes;
mod slack;

use args::Args;
use config::Config;
use dispatcher::EventDispatcher;
use slack::SlackClient;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let addr = SocketAddr::from((args.addr, args.port));
    let api_url = args.api_url.clone();

    let config = Arc::new(Config::from(args));
    let client = SlackClient::new(&api_url, &config.api_token)?;

    info!(
        %addr,
        channel = %config.channel_id,
        keywords = config.greetings.len(),
        "listening for slack events"
    );

    let dispatcher = EventDispatcher::new(config, Arc::new(client));
    warp::serve(routes::routes(dispatcher)).run(addr).await;

    Ok(())
}
