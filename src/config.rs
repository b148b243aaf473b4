use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TURN_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_SYNTHESIS_MODEL: &str = "gemini-3-pro-preview";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Gateway connection settings, read from the environment.
#[derive(Debug, Clone)]
pub struct LensConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Used for turn processing and recalibration.
    pub turn_model: String,
    pub synthesis_model: String,
    pub request_timeout: Duration,
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            turn_model: DEFAULT_TURN_MODEL.to_string(),
            synthesis_model: DEFAULT_SYNTHESIS_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LensConfig {
    /// `GEMINI_API_KEY` (or `API_KEY`), `LENS_BASE_URL`, `LENS_TURN_MODEL`,
    /// `LENS_SYNTHESIS_MODEL`, `LENS_TIMEOUT_SECS`. Unset values keep defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = non_empty("LENS_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            api_key: non_empty("GEMINI_API_KEY").or_else(|| non_empty("API_KEY")),
            base_url: non_empty("LENS_BASE_URL").unwrap_or(defaults.base_url),
            turn_model: non_empty("LENS_TURN_MODEL").unwrap_or(defaults.turn_model),
            synthesis_model: non_empty("LENS_SYNTHESIS_MODEL").unwrap_or(defaults.synthesis_model),
            request_timeout,
        }
    }
}

/// Session constants.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Prior turns sent with each turn-processing request.
    pub context_window: usize,
    /// Turns included in the synthesis prompt.
    pub synthesis_window: usize,
    /// Turn count at which synthesis becomes eligible.
    pub synthesis_threshold: usize,
    /// Theories kept from a synthesis response.
    pub theory_count: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            context_window: 15,
            synthesis_window: 20,
            synthesis_threshold: 5,
            theory_count: 3,
        }
    }
}
