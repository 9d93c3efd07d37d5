use serde::Deserializer;
use serde_derive::Deserialize;

/// Fields shared by every delivery, read before the payload is trusted.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    UrlVerification(UrlVerification),
    EventCallback(EventCallback),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct UrlVerification {
    pub challenge: String,
}

#[derive(Debug, Deserialize)]
pub struct EventCallback {
    pub event: InnerEvent,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InnerEvent {
    AppMention(AppMention),
    Message(Message),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct AppMention {
    #[serde(default, deserialize_with = "nullable")]
    pub channel: String,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl AppMention {
    pub fn ts(&self) -> Option<&str> {
        first_ts(&self.ts, &self.timestamp)
    }
}

#[derive(Debug, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "nullable")]
    pub channel: String,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub user: String,
    #[serde(default, deserialize_with = "nullable")]
    pub text: String,
    #[serde(default, deserialize_with = "nullable")]
    pub channel_type: String,
}

impl Message {
    pub fn ts(&self) -> Option<&str> {
        first_ts(&self.ts, &self.timestamp)
    }
}

/// `ts` wins over `timestamp`; empty values count as absent.
fn first_ts<'a>(ts: &'a Option<String>, timestamp: &'a Option<String>) -> Option<&'a str> {
    [ts, timestamp]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .find(|ts| !ts.is_empty())
}

/// Reads `null` as an empty string.
fn nullable<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(<Option<String> as serde::Deserialize>::deserialize(deserializer)?.unwrap_or_default())
}
