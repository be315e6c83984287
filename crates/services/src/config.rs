use std::env;
use std::time::Duration;

use quiz_core::model::PassPolicy;
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const GENERATE_PATH: &str = "api/quiz/generate";
const SUBMIT_PATH: &str = "api/quiz/submit";

/// Where the quiz collaborators live and how sessions are judged.
#[derive(Clone, Debug)]
pub struct QuizServiceConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub pass_policy: PassPolicy,
}

impl QuizServiceConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pass_policy: PassPolicy::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError` for unparseable or non-http(s) urls.
    pub fn from_base_url(raw: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(parse_base_url(raw)?))
    }

    /// Read configuration from the environment, falling back to defaults for
    /// unset variables.
    ///
    /// - `QUIZ_API_BASE_URL`
    /// - `QUIZ_REQUEST_TIMEOUT_SECS`
    /// - `QUIZ_PASS_THRESHOLD`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(None, non_empty_var)
    }

    /// Like [`QuizServiceConfig::from_env`], but `base_url` replaces
    /// `QUIZ_API_BASE_URL`, which is then not read at all.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid `base_url` or a malformed
    /// variable.
    pub fn from_env_with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Self::from_vars(Some(base_url), non_empty_var)
    }

    fn from_vars(
        base_url: Option<&str>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match base_url {
            Some(raw) => Self::from_base_url(raw)?,
            None => Self::from_base_url(
                &var("QUIZ_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            )?,
        };

        if let Some(raw) = var("QUIZ_REQUEST_TIMEOUT_SECS") {
            config.timeout = parse_timeout(&raw)?;
        }
        if let Some(raw) = var("QUIZ_PASS_THRESHOLD") {
            let min = parse_number("QUIZ_PASS_THRESHOLD", &raw)?;
            let min = usize::try_from(min).map_err(|_| ConfigError::InvalidNumber {
                var: "QUIZ_PASS_THRESHOLD",
                raw: raw.clone(),
            })?;
            config.pass_policy = PassPolicy::new(min)?;
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_pass_policy(mut self, policy: PassPolicy) -> Self {
        self.pass_policy = policy;
        self
    }

    #[must_use]
    pub fn generate_url(&self) -> String {
        endpoint(&self.base_url, GENERATE_PATH)
    }

    #[must_use]
    pub fn submit_url(&self) -> String {
        endpoint(&self.base_url, SUBMIT_PATH)
    }
}

fn endpoint(base: &Url, path: &str) -> String {
    format!("{}/{path}", base.as_str().trim_end_matches('/'))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        raw: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(url)
}

/// A zero timeout would fail every request, so it is rejected.
fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match parse_number("QUIZ_REQUEST_TIMEOUT_SECS", raw)? {
        0 => Err(ConfigError::InvalidNumber {
            var: "QUIZ_REQUEST_TIMEOUT_SECS",
            raw: raw.to_string(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn parse_number(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        raw: raw.to_string(),
    })
}
