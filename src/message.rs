use serde_derive::{Deserialize, Serialize};

/// Body of a `reactions.add` call.
#[derive(Debug, Serialize)]
pub struct AddReaction<'a> {
    pub channel: &'a str,
    pub timestamp: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}
