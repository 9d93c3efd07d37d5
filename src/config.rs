use crate::args::Args;
use secrecy::SecretString;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("greeting map is empty")]
    EmptyGreetingMap,

    #[error("greeting map entry `{0}` is not of the form keyword:emoji")]
    MalformedEntry(String),

    #[error("greeting map entry `{0}` has an empty keyword or emoji")]
    EmptyEntry(String),

    #[error("keyword `{0}` appears more than once in the greeting map")]
    DuplicateKeyword(String),
}

/// Keyword to reaction emoji table, kept in the order it was configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GreetingMap {
    entries: Vec<(String, String)>,
}

impl GreetingMap {
    pub fn new<K, E>(entries: impl IntoIterator<Item = (K, E)>) -> Result<Self, ConfigError>
    where
        K: Into<String>,
        E: Into<String>,
    {
        let mut map = Self::default();
        for (keyword, emoji) in entries {
            map.insert(keyword.into(), emoji.into())?;
        }
        if map.is_empty() {
            return Err(ConfigError::EmptyGreetingMap);
        }
        Ok(map)
    }

    fn insert(&mut self, keyword: String, emoji: String) -> Result<(), ConfigError> {
        if keyword.is_empty() || emoji.is_empty() {
            return Err(ConfigError::EmptyEntry(format!("{keyword}:{emoji}")));
        }
        if self.entries.iter().any(|(k, _)| *k == keyword) {
            return Err(ConfigError::DuplicateKeyword(keyword));
        }
        self.entries.push((keyword, emoji));
        Ok(())
    }

    /// Emoji of the first keyword contained in `text`.
    pub fn find(&self, text: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(keyword, _)| text.contains(keyword.as_str()))
            .map(|(_, emoji)| emoji.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for GreetingMap {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let pairs = s
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                entry
                    .split_once(':')
                    .map(|(keyword, emoji)| (keyword.trim(), emoji.trim()))
                    .ok_or_else(|| ConfigError::MalformedEntry(entry.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(pairs)
    }
}

/// Settings every delivery is checked against. Built once at startup.
pub struct Config {
    pub api_token: SecretString,
    pub verification_token: SecretString,
    pub bot_name: String,
    pub channel_id: String,
    pub greetings: GreetingMap,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            api_token: SecretString::from(args.token),
            verification_token: SecretString::from(args.verification_token),
            bot_name: args.bot_name,
            channel_id: args.channel_id,
            greetings: args.greeting_map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pairs_in_order() {
        let map: GreetingMap = "hello:wave, good morning:sunny,bye:wave".parse().unwrap();
        assert_eq!(
            map,
            GreetingMap::new([("hello", "wave"), ("good morning", "sunny"), ("bye", "wave")])
                .unwrap()
        );
    }

    #[test]
    fn splits_on_first_colon_only() {
        let map: GreetingMap = "time:clock:face".parse().unwrap();
        assert_eq!(map.find("what time is it"), Some("clock:face"));
    }

    #[test]
    fn ignores_trailing_separator() {
        let map: GreetingMap = "hello:wave,".parse().unwrap();
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());
        assert!(GreetingMap::default().is_empty());
    }

    #[test]
    fn rejects_bad_maps() {
        assert_eq!("".parse::<GreetingMap>(), Err(ConfigError::EmptyGreetingMap));
        assert_eq!(
            "hello".parse::<GreetingMap>(),
            Err(ConfigError::MalformedEntry("hello".into()))
        );
        assert_eq!(
            ":wave".parse::<GreetingMap>(),
            Err(ConfigError::EmptyEntry(":wave".into()))
        );
        assert_eq!(
            "hi:wave,hi:smile".parse::<GreetingMap>(),
            Err(ConfigError::DuplicateKeyword("hi".into()))
        );
    }

    #[test]
    fn first_configured_keyword_wins() {
        let map = GreetingMap::new([("morning", "sunny"), ("good", "+1")]).unwrap();
        assert_eq!(map.find("good morning all"), Some("sunny"));
        assert_eq!(map.find("good night"), Some("+1"));
        assert_eq!(map.find("evening"), None);
    }
}
