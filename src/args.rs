use crate::config::GreetingMap;
use clap::Parser;
use std::net::Ipv4Addr;

#[derive(Parser)]
#[clap(author, version, about)]
pub struct Args {
    #[clap(long, env("ADDR"), default_value = "0.0.0.0")]
    pub addr: Ipv4Addr,

    #[clap(long, env("PORT"), default_value = "8080")]
    pub port: u16,

    /// Bot token used to call the Web API.
    #[clap(long, env("SLACK_TOKEN"), hide_env_values = true)]
    pub token: String,

    /// Token Slack embeds in every Events API delivery.
    #[clap(long, env("SLACK_V_TOKEN"), hide_env_values = true)]
    pub verification_token: String,

    /// Messages authored by this user are never reacted to.
    #[clap(long, env("SLACK_BOT_NAME"))]
    pub bot_name: String,

    #[clap(long, env("SLACK_CHANNEL_ID"))]
    pub channel_id: String,

    /// Comma separated `keyword:emoji` pairs, checked in order.
    #[clap(long, env("SLACK_GREETING_MAP"))]
    pub greeting_map: GreetingMap,

    #[clap(long, env("SLACK_API_URL"), default_value = "https://slack.com/api")]
    pub api_url: String,
}
