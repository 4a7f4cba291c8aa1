// Runtime configuration. Credentials and identifiers come from the
// environment (optionally seeded from a .env file) and never from source.

use std::time::Duration;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_FIREBASE_AUTH_BASE_URL: &str = "https://identitytoolkit.googleapis.com";
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";
/// Google's public sample spreadsheet.
pub const DEFAULT_TEST_SHEET_ID: &str = "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms";
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct FirebaseSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SheetsSettings {
    pub api_key: Option<String>,
    pub sheet_id: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SmokeConfig {
    pub gemini: GeminiSettings,
    pub firebase: FirebaseSettings,
    pub sheets: SheetsSettings,
}

impl SmokeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values are treated as unset so an empty line in .env does not
        // turn into an empty API key.
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let ai_timeout = parse_secs(
            get("EKATRA_AI_TIMEOUT_SECS"),
            "EKATRA_AI_TIMEOUT_SECS",
            DEFAULT_AI_TIMEOUT_SECS,
        );
        let http_timeout = parse_secs(
            get("EKATRA_HTTP_TIMEOUT_SECS"),
            "EKATRA_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        );

        Self {
            gemini: GeminiSettings {
                api_key: get("GEMINI_API_KEY"),
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: base_url(get("GEMINI_BASE_URL"), DEFAULT_GEMINI_BASE_URL),
                timeout: ai_timeout,
            },
            firebase: FirebaseSettings {
                api_key: get("FIREBASE_API_KEY"),
                base_url: base_url(get("FIREBASE_AUTH_BASE_URL"), DEFAULT_FIREBASE_AUTH_BASE_URL),
                timeout: http_timeout,
            },
            sheets: SheetsSettings {
                api_key: get("SHEETS_API_KEY"),
                sheet_id: get("SHEETS_TEST_SHEET_ID")
                    .unwrap_or_else(|| DEFAULT_TEST_SHEET_ID.to_string()),
                base_url: base_url(get("SHEETS_BASE_URL"), DEFAULT_SHEETS_BASE_URL),
                timeout: http_timeout,
            },
        }
    }

    /// Names of credentials that are not set, for a startup warning.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.gemini.api_key.is_none() {
            missing.push("GEMINI_API_KEY");
        }
        if self.firebase.api_key.is_none() {
            missing.push("FIREBASE_API_KEY");
        }
        if self.sheets.api_key.is_none() {
            missing.push("SHEETS_API_KEY");
        }
        missing
    }
}

fn base_url(value: Option<String>, default: &str) -> String {
    value
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn parse_secs(value: Option<String>, name: &str, default: u64) -> Duration {
    let secs = match value {
        None => default,
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                tracing::warn!(
                    "Invalid {} value {:?}, using default of {}s",
                    name,
                    raw,
                    default
                );
                default
            }
        },
    };
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> SmokeConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SmokeConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.gemini.model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.gemini.timeout, Duration::from_secs(30));
        assert_eq!(config.firebase.timeout, Duration::from_secs(10));
        assert_eq!(config.sheets.timeout, Duration::from_secs(10));
        assert_eq!(config.sheets.sheet_id, DEFAULT_TEST_SHEET_ID);
        assert_eq!(
            config.missing_credentials(),
            vec!["GEMINI_API_KEY", "FIREBASE_API_KEY", "SHEETS_API_KEY"]
        );
    }

    #[test]
    fn overrides_are_read_and_trimmed() {
        let config = config_from(&[
            ("GEMINI_API_KEY", " gem-key "),
            ("GEMINI_MODEL", "gemini-2.5-flash"),
            ("SHEETS_BASE_URL", "http://127.0.0.1:1234/"),
            ("EKATRA_HTTP_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(config.gemini.api_key.as_deref(), Some("gem-key"));
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert_eq!(config.sheets.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.sheets.timeout, Duration::from_secs(3));
        assert_eq!(config.firebase.timeout, Duration::from_secs(3));
        assert_eq!(config.gemini.timeout, Duration::from_secs(30));
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let config = config_from(&[("FIREBASE_API_KEY", "   "), ("SHEETS_API_KEY", "k")]);
        assert!(config.firebase.api_key.is_none());
        assert_eq!(
            config.missing_credentials(),
            vec!["GEMINI_API_KEY", "FIREBASE_API_KEY"]
        );
    }

    #[test]
    fn invalid_timeouts_fall_back_to_defaults() {
        let config = config_from(&[
            ("EKATRA_AI_TIMEOUT_SECS", "soon"),
            ("EKATRA_HTTP_TIMEOUT_SECS", "0"),
        ]);
        assert_eq!(config.gemini.timeout, Duration::from_secs(30));
        assert_eq!(config.sheets.timeout, Duration::from_secs(10));
    }
}
