//! HTTP transport shared by the maps providers.

use std::future::Future;

use carefinder_core::{GeocodeError, RouteError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::{MapsConfig, ProviderBuildError};

/// Transport-level failure, converted into the caller's error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FetchError {
    Timeout { url: String, timeout_secs: u64 },
    Http { url: String, status: u16, message: String },
    Network { url: String, message: String },
    Parse { message: String },
}

impl From<FetchError> for GeocodeError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout { url, timeout_secs } => Self::Timeout { url, timeout_secs },
            FetchError::Http {
                url,
                status,
                message,
            } => Self::Http {
                url,
                status,
                message,
            },
            FetchError::Network { url, message } => Self::Network { url, message },
            FetchError::Parse { message } => Self::Parse { message },
        }
    }
}

impl From<FetchError> for RouteError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout { url, timeout_secs } => Self::Timeout { url, timeout_secs },
            FetchError::Http {
                url,
                status,
                message,
            } => Self::Http {
                url,
                status,
                message,
            },
            FetchError::Network { url, message } => Self::Network { url, message },
            FetchError::Parse { message } => Self::Parse { message },
        }
    }
}

/// A `reqwest` client paired with the runtime that drives it.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime, requests run on the owned current-thread
/// runtime. Inside a multi-threaded runtime the ambient handle is used through
/// [`tokio::task::block_in_place`]. Inside a `current_thread` runtime the owned
/// runtime is used as a fallback, which blocks the caller's executor for the
/// duration of the request.
pub(crate) struct MapsClient {
    client: Client,
    config: MapsConfig,
    base: Url,
    runtime: Runtime,
}

impl std::fmt::Debug for MapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsClient")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

/// Parse `raw` as a base URL that relative endpoint paths extend.
fn parse_base(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim_end_matches('/');
    Url::parse(&format!("{trimmed}/"))
}

impl MapsClient {
    pub(crate) fn new(config: MapsConfig) -> Result<Self, ProviderBuildError> {
        let base = parse_base(&config.base_url).map_err(ProviderBuildError::BaseUrl)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            base,
            runtime,
        })
    }

    /// Resolve `path` against the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ProviderBuildError> {
        self.base.join(path).map_err(ProviderBuildError::BaseUrl)
    }

    /// Issue a GET request and decode the JSON body.
    ///
    /// The API key is appended as the `key` parameter. Error messages report
    /// the endpoint without its query string so the key never leaks.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &Url,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let mut query: Vec<(&str, &str)> = params.to_vec();
        if let Some(key) = self.config.api_key.as_deref() {
            query.push(("key", key));
        }
        let response = self
            .client
            .get(endpoint.clone())
            .query(&query)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err, endpoint))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err, endpoint))?;
        response.json::<T>().await.map_err(|err| FetchError::Parse {
            message: err.without_url().to_string(),
        })
    }

    fn convert_reqwest_error(&self, error: reqwest::Error, endpoint: &Url) -> FetchError {
        let url = endpoint.as_str().to_owned();
        if error.is_timeout() {
            return FetchError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        let status = error.status();
        let message = error.without_url().to_string();
        match status {
            Some(code) => FetchError::Http {
                url,
                status: code.as_u16(),
                message,
            },
            None => FetchError::Network { url, message },
        }
    }

    /// Drive `future` to completion from synchronous code.
    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::bare("https://maps.example.com", "https://maps.example.com/maps/api/geocode/json")]
    #[case::trailing("https://maps.example.com/", "https://maps.example.com/maps/api/geocode/json")]
    #[case::prefixed("http://127.0.0.1:8080/proxy", "http://127.0.0.1:8080/proxy/maps/api/geocode/json")]
    fn endpoints_extend_base_path(#[case] base: &str, #[case] expected: &str) {
        let client = MapsClient::new(MapsConfig::new(base)).expect("client should build");
        let endpoint = client.endpoint("maps/api/geocode/json").expect("valid path");
        assert_eq!(endpoint.as_str(), expected);
    }

    #[rstest]
    fn rejects_relative_base() {
        let err = MapsClient::new(MapsConfig::new("maps.example.com")).expect_err("relative");
        assert!(matches!(err, ProviderBuildError::BaseUrl(_)), "{err}");
    }

    #[rstest]
    fn blocks_on_owned_runtime_outside_tokio() {
        let client = MapsClient::new(MapsConfig::default()).expect("client should build");
        assert_eq!(client.block_on(async { 7 }), 7);
    }

    #[rstest]
    fn fetch_errors_map_onto_collaborator_errors() {
        let timeout = FetchError::Timeout {
            url: "https://maps.example.com/maps/api/geocode/json".to_owned(),
            timeout_secs: 30,
        };
        assert!(matches!(
            GeocodeError::from(timeout.clone()),
            GeocodeError::Timeout {
                timeout_secs: 30,
                ..
            }
        ));
        assert!(matches!(
            RouteError::from(timeout),
            RouteError::Timeout {
                timeout_secs: 30,
                ..
            }
        ));
        let parse = FetchError::Parse {
            message: "eof".to_owned(),
        };
        assert_eq!(
            RouteError::from(parse),
            RouteError::Parse {
                message: "eof".to_owned()
            }
        );
    }
}
