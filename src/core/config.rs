use std::collections::HashSet;
use std::env;

use crate::errors::UnrollError;

pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Channels whose thread replies get unrolled. Built once at start, read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelAllowList {
    channels: HashSet<String>,
}

impl ChannelAllowList {
    /// Parse a comma-separated list of channel IDs. Whitespace around entries is
    /// trimmed and empty entries are dropped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        raw.split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    #[must_use]
    pub fn contains(&self, channel_id: &str) -> bool {
        self.channels.contains(channel_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}

impl FromIterator<String> for ChannelAllowList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            channels: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_app_token: String,
    pub slack_bot_token: String,
    pub channels: ChannelAllowList,
    pub slack_api_url: String,
    pub debug: bool,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `UnrollError::Config` when either Slack token is missing or empty.
    pub fn from_env() -> Result<Self, UnrollError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. `from_env` delegates here.
    ///
    /// # Errors
    ///
    /// Returns `UnrollError::Config` when either Slack token is missing or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UnrollError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| UnrollError::Config(format!("{key} is not set")))
        };

        Ok(Self {
            slack_app_token: required("SLACK_APP_TOKEN")?,
            slack_bot_token: required("SLACK_BOT_TOKEN")?,
            channels: ChannelAllowList::parse(&lookup("SLACK_CHANNELS").unwrap_or_default()),
            slack_api_url: lookup("SLACK_API_URL")
                .filter(|v| !v.trim().is_empty())
                .map_or_else(
                    || DEFAULT_SLACK_API_URL.to_string(),
                    |v| v.trim_end_matches('/').to_string(),
                ),
            debug: lookup("UNROLL_DEBUG").is_some_and(|v| is_truthy(&v)),
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
