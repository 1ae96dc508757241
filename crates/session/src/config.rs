use std::str::FromStr;
use std::time::Duration;

use mp4label_core::naming::DEFAULT_MEDIA_EXTENSIONS;
use mp4label_sync::http::DEFAULT_REQUEST_TIMEOUT;

/// Debounce delay between the last edit and the autosave attempt.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1500);

/// Editing session configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local annotation server.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Base URL of the annotation API (default: `http://localhost:8080`).
    pub api_url: String,
    /// Quiet period before an autosave attempt (default: 1500 ms).
    pub autosave_delay: Duration,
    /// Per-request HTTP timeout (default: 10 s).
    pub request_timeout: Duration,
    /// Extensions stripped from video filenames to form the stem.
    pub media_extensions: Vec<String>,
    /// Fetch the model-generated reference annotation on open.
    pub load_model_annotations: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".into(),
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            media_extensions: DEFAULT_MEDIA_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            load_model_annotations: false,
        }
    }
}

impl SessionConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                 |
    /// |--------------------------|-------------------------|
    /// | `ANNOTATION_API_URL`     | `http://localhost:8080` |
    /// | `AUTOSAVE_DELAY_MS`      | `1500`                  |
    /// | `REQUEST_TIMEOUT_SECS`   | `10`                    |
    /// | `MEDIA_EXTENSIONS`       | `mp4`                   |
    /// | `LOAD_MODEL_ANNOTATIONS` | `false`                 |
    ///
    /// Unparseable values are logged and replaced by the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = std::env::var("ANNOTATION_API_URL").unwrap_or(defaults.api_url);

        let autosave_delay = env_parse("AUTOSAVE_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.autosave_delay);

        let request_timeout = env_parse("REQUEST_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let media_extensions = std::env::var("MEDIA_EXTENSIONS")
            .ok()
            .map(|raw| parse_extensions(&raw))
            .filter(|exts| !exts.is_empty())
            .unwrap_or(defaults.media_extensions);

        let load_model_annotations =
            env_parse("LOAD_MODEL_ANNOTATIONS").unwrap_or(defaults.load_model_annotations);

        Self {
            api_url,
            autosave_delay,
            request_timeout,
            media_extensions,
            load_model_annotations,
        }
    }
}

/// Split a comma-separated extension list, dropping blanks and leading dots.
fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn env_parse<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "Ignoring unparseable environment variable");
            None
        }
    }
}
