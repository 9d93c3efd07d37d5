use crate::dispatcher::ReactionAction;
use crate::message::{AddReaction, ApiResponse};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReactionError {
    #[error("request to slack failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("slack responded with {0}")]
    Status(StatusCode),

    #[error("slack rejected the reaction: {0}")]
    Api(String),
}

/// Something that can attach an emoji reaction to a message.
#[async_trait]
pub trait ReactionPoster: Send + Sync {
    async fn add_reaction(&self, action: &ReactionAction) -> Result<(), ReactionError>;
}

pub struct SlackClient {
    client: reqwest::Client,
    api_url: String,
}

impl SlackClient {
    pub fn new(api_url: &str, token: &SecretString) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth_value =
            header::HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_owned(),
        })
    }
}

#[async_trait]
impl ReactionPoster for SlackClient {
    async fn add_reaction(&self, action: &ReactionAction) -> Result<(), ReactionError> {
        let res = self
            .client
            .post(format!("{}/reactions.add", self.api_url))
            .json(&AddReaction {
                channel: &action.channel,
                timestamp: &action.timestamp,
                name: &action.emoji,
            })
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ReactionError::Status(status));
        }

        let body: ApiResponse = res.json().await?;
        if body.ok {
            Ok(())
        } else {
            Err(ReactionError::Api(
                body.error.unwrap_or_else(|| "unknown_error".into()),
            ))
        }
    }
}
