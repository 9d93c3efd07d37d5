use crate::config::Config;
use crate::event::{AppMention, Envelope, Event, EventCallback, InnerEvent, Message};
use crate::slack::ReactionPoster;
use secrecy::ExposeSecret;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};
use warp::http::StatusCode;
use warp::Reply;

pub const MENTION_EMOJI: &str = "woman-raising-hand";

const CHANNEL_TYPE: &str = "channel";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("malformed event payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("verification token mismatch")]
    TokenMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionAction {
    pub channel: String,
    pub timestamp: String,
    pub emoji: String,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Challenge(String),
    React(ReactionAction),
    Ignore,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl Response {
    pub fn ok() -> Self {
        Self::text(StatusCode::OK, "ok".into())
    }

    pub fn challenge(challenge: String) -> Self {
        Self::text(StatusCode::OK, challenge)
    }

    /// Response whose body is the canonical reason phrase of `status`.
    pub fn status_text(status: StatusCode) -> Self {
        Self::text(
            status,
            status.canonical_reason().unwrap_or_default().to_owned(),
        )
    }

    fn text(status: StatusCode, body: String) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body,
        }
    }
}

impl Reply for Response {
    fn into_response(self) -> warp::reply::Response {
        let reply = warp::reply::with_header(self.body, "content-type", self.content_type);
        warp::reply::with_status(reply, self.status).into_response()
    }
}

#[derive(Clone)]
pub struct EventDispatcher {
    config: Arc<Config>,
    poster: Arc<dyn ReactionPoster>,
}

impl EventDispatcher {
    pub fn new(config: Arc<Config>, poster: Arc<dyn ReactionPoster>) -> Self {
        Self { config, poster }
    }

    #[instrument(skip_all, fields(len = body.len()))]
    pub async fn handle(&self, body: &[u8]) -> Response {
        let event = match self.verify(body) {
            Ok(event) => event,
            Err(err) => {
                error!(%err, "rejecting event delivery");
                return Response::status_text(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        match self.classify(event) {
            Outcome::Challenge(challenge) => {
                info!("url verification");
                Response::challenge(challenge)
            }
            Outcome::React(action) => {
                self.react(&action).await;
                Response::ok()
            }
            Outcome::Ignore => Response::ok(),
        }
    }

    /// Checks the delivery's token before decoding the rest of it.
    pub fn verify(&self, body: &[u8]) -> Result<Event, DispatchError> {
        let envelope: Envelope = serde_json::from_slice(body)?;
        if !tokens_match(&envelope.token, self.config.verification_token.expose_secret()) {
            return Err(DispatchError::TokenMismatch);
        }
        Ok(serde_json::from_slice(body)?)
    }

    pub fn classify(&self, event: Event) -> Outcome {
        match event {
            Event::UrlVerification(verification) => Outcome::Challenge(verification.challenge),
            Event::EventCallback(EventCallback { event }) => match event {
                InnerEvent::AppMention(mention) => {
                    mention_reaction(mention).map_or(Outcome::Ignore, Outcome::React)
                }
                InnerEvent::Message(msg) => self
                    .greeting_reaction(msg)
                    .map_or(Outcome::Ignore, Outcome::React),
                InnerEvent::Other => Outcome::Ignore,
            },
            Event::Other => Outcome::Ignore,
        }
    }

    fn greeting_reaction(&self, msg: Message) -> Option<ReactionAction> {
        if msg.user == self.config.bot_name
            || msg.channel_type != CHANNEL_TYPE
            || msg.channel != self.config.channel_id
        {
            debug!(channel = %msg.channel, user = %msg.user, "skipping message");
            return None;
        }

        let emoji = self.config.greetings.find(&msg.text)?;
        let Some(ts) = msg.ts() else {
            debug!(channel = %msg.channel, "message has no timestamp");
            return None;
        };
        Some(ReactionAction {
            timestamp: ts.to_owned(),
            channel: msg.channel,
            emoji: emoji.to_owned(),
        })
    }

    async fn react(&self, action: &ReactionAction) {
        match self.poster.add_reaction(action).await {
            Ok(()) => info!(
                channel = %action.channel,
                ts = %action.timestamp,
                emoji = %action.emoji,
                "added reaction"
            ),
            Err(err) => warn!(
                channel = %action.channel,
                ts = %action.timestamp,
                emoji = %action.emoji,
                %err,
                "failed to add reaction"
            ),
        }
    }
}

fn mention_reaction(mention: AppMention) -> Option<ReactionAction> {
    match mention.ts() {
        Some(ts) if !mention.channel.is_empty() => Some(ReactionAction {
            timestamp: ts.to_owned(),
            channel: mention.channel,
            emoji: MENTION_EMOJI.to_owned(),
        }),
        _ => {
            debug!(channel = %mention.channel, "mention has no channel or timestamp");
            None
        }
    }
}

/// Compares without short-circuiting on the first differing byte.
fn tokens_match(given: &str, expected: &str) -> bool {
    given.len() == expected.len()
        && given
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}
