use std::{env, fs, path::Path, time::Duration};

use crate::{domain::ChatId, errors::Error, Result};

pub const DEFAULT_SESSION_NAME: &str = "L2RMUSIC";
pub const DEFAULT_MAX_CONCURRENT_TRANSMISSIONS: usize = 7;
pub const DEFAULT_FLOOD_SLEEP_THRESHOLD: Duration = Duration::from_secs(10);

/// Typed configuration: API credentials plus the log channel.
#[derive(Clone, Debug)]
pub struct Config {
    // Credentials
    pub api_id: i32,
    pub api_hash: String,
    pub bot_token: String,

    // Startup checks
    pub logger_id: ChatId,

    // Client settings
    pub session_name: String,
    pub max_concurrent_transmissions: usize,
    pub flood_sleep_threshold: Duration,
}

impl Config {
    /// Load from the process environment, after merging `.env` (if present).
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        let api_id = get("API_ID")
            .ok_or_else(|| required("API_ID"))?
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| Error::Config("API_ID must be a positive integer".to_string()))?;

        let api_hash = get("API_HASH").ok_or_else(|| required("API_HASH"))?;
        let bot_token = get("BOT_TOKEN").ok_or_else(|| required("BOT_TOKEN"))?;

        let logger_id = get("LOGGER_ID")
            .ok_or_else(|| required("LOGGER_ID"))?
            .trim()
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| Error::Config("LOGGER_ID must be a numeric chat id".to_string()))?;

        let session_name =
            get("BOT_SESSION_NAME").unwrap_or_else(|| DEFAULT_SESSION_NAME.to_string());

        let max_concurrent_transmissions = get("MAX_CONCURRENT_TRANSMISSIONS")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_CONCURRENT_TRANSMISSIONS)
            .max(1);

        let flood_sleep_threshold = get("FLOOD_SLEEP_THRESHOLD")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_FLOOD_SLEEP_THRESHOLD);

        Ok(Self {
            api_id,
            api_hash: api_hash.trim().to_string(),
            bot_token: bot_token.trim().to_string(),
            logger_id,
            session_name,
            max_concurrent_transmissions,
            flood_sleep_threshold,
        })
    }
}

fn required(key: &str) -> Error {
    Error::Config(format!("{key} environment variable is required"))
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("API_ID", "12345"),
        ("API_HASH", "0123456789abcdef0123456789abcdef"),
        ("BOT_TOKEN", "123:abc"),
        ("LOGGER_ID", "-1001234567890"),
    ];

    #[test]
    fn loads_required_values_and_defaults() {
        let cfg = Config::from_lookup(lookup(BASE)).unwrap();
        assert_eq!(cfg.api_id, 12345);
        assert_eq!(cfg.bot_token, "123:abc");
        assert_eq!(cfg.logger_id, ChatId(-1001234567890));
        assert_eq!(cfg.session_name, "L2RMUSIC");
        assert_eq!(cfg.max_concurrent_transmissions, 7);
        assert_eq!(cfg.flood_sleep_threshold, Duration::from_secs(10));
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "BOT_TOKEN")
            .collect();
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("BOT_TOKEN")));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut map: HashMap<&str, &str> = BASE.iter().copied().collect();
        map.insert("API_HASH", "   ");
        let pairs: Vec<_> = map.into_iter().collect();
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("API_HASH")));
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let mut map: HashMap<&str, &str> = BASE.iter().copied().collect();
        map.insert("API_ID", "abc");
        let pairs: Vec<_> = map.into_iter().collect();
        assert!(Config::from_lookup(lookup(&pairs)).is_err());

        let mut map: HashMap<&str, &str> = BASE.iter().copied().collect();
        map.insert("API_ID", "0");
        let pairs: Vec<_> = map.into_iter().collect();
        assert!(Config::from_lookup(lookup(&pairs)).is_err());

        let mut map: HashMap<&str, &str> = BASE.iter().copied().collect();
        map.insert("LOGGER_ID", "@mychannel");
        let pairs: Vec<_> = map.into_iter().collect();
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("LOGGER_ID")));
    }

    #[test]
    fn optional_overrides_are_applied() {
        let mut pairs = BASE.to_vec();
        pairs.push(("BOT_SESSION_NAME", "other"));
        pairs.push(("MAX_CONCURRENT_TRANSMISSIONS", "0"));
        pairs.push(("FLOOD_SLEEP_THRESHOLD", "30"));
        let cfg = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(cfg.session_name, "other");
        assert_eq!(cfg.max_concurrent_transmissions, 1);
        assert_eq!(cfg.flood_sleep_threshold, Duration::from_secs(30));
    }

    #[test]
    fn dotenv_parser_skips_comments_and_strips_quotes() {
        let parsed = parse_dotenv("# creds\nAPI_ID=1\n\nAPI_HASH=\"abc\"\nBOT_TOKEN='t:k'\nnoise\n=x\n");
        assert_eq!(
            parsed,
            vec![
                ("API_ID".to_string(), "1".to_string()),
                ("API_HASH".to_string(), "abc".to_string()),
                ("BOT_TOKEN".to_string(), "t:k".to_string()),
            ]
        );
    }
}
