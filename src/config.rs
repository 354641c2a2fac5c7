//! Validated server settings.

use std::time::Duration;

use reqwest::Url;

use crate::{Error, timezone::get_timezone};

/// The settle timeout used when none is given.
pub const DEFAULT_SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings needed to run the dashboard server.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// The root of the payments API, e.g. "https://fe-task-api.mainstack.io".
    pub api_base_url: Url,

    /// The port to serve the dashboard from.
    pub port: u16,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Date presets and manually picked dates are resolved in this timezone.
    pub local_timezone: String,

    /// How long a request for the dashboard body waits for in-flight API
    /// requests before rendering whatever state the store is in.
    pub settle_timeout: Duration,
}

impl DashboardConfig {
    /// Check and collect the server settings.
    ///
    /// # Errors
    /// Returns [Error::InvalidApiBaseUrl] if `api_base_url` is not an absolute
    /// HTTP(S) URL, or [Error::InvalidTimezoneError] if `local_timezone` is not
    /// a canonical timezone name.
    pub fn new(
        api_base_url: &str,
        port: u16,
        local_timezone: &str,
        settle_timeout: Duration,
    ) -> Result<Self, Error> {
        let api_base_url = Url::parse(api_base_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| Error::InvalidApiBaseUrl(api_base_url.to_owned()))?;

        get_timezone(local_timezone)?;

        Ok(Self {
            api_base_url,
            port,
            local_timezone: local_timezone.to_owned(),
            settle_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SETTLE_TIMEOUT, DashboardConfig};
    use crate::Error;

    #[test]
    fn accepts_valid_settings() {
        let config = DashboardConfig::new(
            "https://fe-task-api.mainstack.io",
            3000,
            "Pacific/Auckland",
            DEFAULT_SETTLE_TIMEOUT,
        )
        .unwrap();

        assert_eq!(
            config.api_base_url.host_str(),
            Some("fe-task-api.mainstack.io")
        );
        assert_eq!(config.local_timezone, "Pacific/Auckland");
    }

    #[test]
    fn rejects_relative_url() {
        let result = DashboardConfig::new("/api", 3000, "Etc/UTC", DEFAULT_SETTLE_TIMEOUT);

        assert_eq!(result, Err(Error::InvalidApiBaseUrl("/api".to_owned())));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let result =
            DashboardConfig::new("ftp://example.com", 3000, "Etc/UTC", DEFAULT_SETTLE_TIMEOUT);

        assert_eq!(
            result,
            Err(Error::InvalidApiBaseUrl("ftp://example.com".to_owned()))
        );
    }

    #[test]
    fn rejects_unknown_timezone() {
        let result = DashboardConfig::new(
            "http://localhost:8080",
            3000,
            "Middle/Earth",
            DEFAULT_SETTLE_TIMEOUT,
        );

        assert_eq!(
            result,
            Err(Error::InvalidTimezoneError("Middle/Earth".to_owned()))
        );
    }
}
