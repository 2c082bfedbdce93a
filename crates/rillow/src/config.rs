//! Client and response configuration

use url::Url;

use crate::error::ConfigError;
use crate::simplify::SimplifyOptions;
use crate::xml;

/// Service root every endpoint path is joined onto
pub const DEFAULT_BASE_URL: &str = "http://www.zillow.com/webservice/";
/// Environment variable holding the web service id
pub const ZWSID_ENV: &str = "RILLOW_ZWSID";
/// Environment variable overriding [`DEFAULT_BASE_URL`]
pub const BASE_URL_ENV: &str = "RILLOW_BASE_URL";

const DEFAULT_USER_AGENT: &str = concat!("rillow/", env!("CARGO_PKG_VERSION"));

/// How response bodies are read and folded into a document tree
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseConfig {
    pub parser: xml::Config,
    pub simplify: SimplifyOptions,
}

/// Settings shared by every call a client makes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    zws_id: String,
    base_url: Url,
    user_agent: String,
    response: ResponseConfig,
}

impl ClientConfig {
    /// Configuration for the public service endpoint
    pub fn new(zws_id: impl Into<String>) -> Result<Self, ConfigError> {
        let zws_id = zws_id.into();
        if zws_id.trim().is_empty() {
            return Err(ConfigError::MissingServiceId(ZWSID_ENV));
        }
        Ok(Self {
            zws_id,
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            response: ResponseConfig::default(),
        })
    }

    /// Read [`ZWSID_ENV`] and, if set, [`BASE_URL_ENV`] from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`] with a custom variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let zws_id = lookup(ZWSID_ENV).ok_or(ConfigError::MissingServiceId(ZWSID_ENV))?;
        let config = Self::new(zws_id)?;
        match lookup(BASE_URL_ENV) {
            Some(base_url) if !base_url.trim().is_empty() => config.with_base_url(&base_url),
            _ => Ok(config),
        }
    }

    /// Point the client at another service root, e.g. a local mock
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_response(mut self, response: ResponseConfig) -> Self {
        self.response = response;
        self
    }

    pub fn zws_id(&self) -> &str {
        &self.zws_id
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn response(&self) -> &ResponseConfig {
        &self.response
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let raw = raw.trim();
    // endpoint paths are joined relative to the last segment
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    let url = Url::parse(&normalized).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::UnsupportedBaseUrl(raw.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_new_uses_public_endpoint() -> Result<(), ConfigError> {
        let config = ClientConfig::new("X1-abc")?;
        assert_eq!(config.zws_id(), "X1-abc");
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert!(config.user_agent().starts_with("rillow/"));
        Ok(())
    }

    #[test]
    fn test_empty_service_id_is_rejected() {
        assert!(matches!(
            ClientConfig::new(" "),
            Err(ConfigError::MissingServiceId(ZWSID_ENV))
        ));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() -> Result<(), ConfigError> {
        let config = ClientConfig::new("id")?.with_base_url("http://127.0.0.1:8080/webservice")?;
        assert_eq!(config.base_url().as_str(), "http://127.0.0.1:8080/webservice/");
        Ok(())
    }

    #[test]
    fn test_invalid_base_url() -> Result<(), ConfigError> {
        let config = ClientConfig::new("id")?;
        assert!(matches!(
            config.clone().with_base_url("not a url"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            config.with_base_url("mailto:someone@example.com"),
            Err(ConfigError::UnsupportedBaseUrl(_))
        ));
        Ok(())
    }

    #[test]
    fn test_from_vars() -> Result<(), ConfigError> {
        let config = ClientConfig::from_vars(lookup(&[
            (ZWSID_ENV, "X1-env"),
            (BASE_URL_ENV, "http://localhost:9000/"),
        ]))?;
        assert_eq!(config.zws_id(), "X1-env");
        assert_eq!(config.base_url().as_str(), "http://localhost:9000/");

        let config = ClientConfig::from_vars(lookup(&[(ZWSID_ENV, "X1-env"), (BASE_URL_ENV, "")]))?;
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        Ok(())
    }

    #[test]
    fn test_from_vars_requires_service_id() {
        assert!(matches!(
            ClientConfig::from_vars(lookup(&[])),
            Err(ConfigError::MissingServiceId(_))
        ));
    }
}
