//! Generic JSON endpoint wrapper around the HTTP client.

use crate::config::ApiConfig;
use crate::error::{HubError, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Client for the platform API.
///
/// Owns one [`reqwest::Client`] configured with the response and connect
/// timeouts from [`ApiConfig`] and hands out [`Endpoint`] values.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// Build a client from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| HubError::ApiError {
                method: "INIT".to_string(),
                endpoint: config.base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { http, config })
    }

    /// Create an endpoint for a path relative to the base URL.
    ///
    /// The path may contain `{}` placeholders filled in later with
    /// [`Endpoint::with_path_args`].
    #[must_use]
    pub fn endpoint(&self, path: impl Into<String>) -> Endpoint {
        Endpoint {
            http: self.http.clone(),
            base_url: self.config.base_url.clone(),
            path: path.into(),
            headers: Vec::new(),
            service_account: None,
        }
    }

    /// Create an endpoint that authenticates with the configured
    /// service account.
    #[must_use]
    pub fn authenticated_endpoint(&self, path: impl Into<String>) -> Endpoint {
        let mut endpoint = self.endpoint(path);
        endpoint.service_account = Some((
            self.config.account_name.clone(),
            self.config.account_password.clone(),
        ));
        endpoint
    }
}

/// One addressable API endpoint.
///
/// Collects path arguments and headers, then performs JSON-typed
/// requests. Request/response bodies are logged at debug level; failures
/// carry the endpoint path and HTTP method in the error.
#[derive(Debug, Clone)]
pub struct Endpoint {
    http: reqwest::Client,
    base_url: String,
    path: String,
    headers: Vec<(String, String)>,
    service_account: Option<(String, String)>,
}

impl Endpoint {
    /// Fill the `{}` placeholders of the path, in order.
    ///
    /// When every argument is empty the placeholder segments are stripped
    /// instead, so `"athletes/{}/testings"` addresses the collection
    /// route `"athletes/testings"`.
    #[must_use]
    pub fn with_path_args(mut self, args: &[&str]) -> Self {
        if args.iter().all(|arg| arg.is_empty()) {
            self.path = self.path.replace("{}/", "");
        } else {
            for arg in args {
                self.path = self.path.replacen("{}", arg, 1);
            }
        }
        self
    }

    /// Add a header sent with every request on this endpoint.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The resolved path of this endpoint.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    fn header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| self.api_error("HEADERS", &e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| self.api_error("HEADERS", &e.to_string()))?;
            map.insert(name, value);
        }
        Ok(map)
    }

    fn api_error(&self, method: &str, message: &str) -> HubError {
        HubError::ApiError {
            method: method.to_string(),
            endpoint: self.path.clone(),
            message: message.to_string(),
        }
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.service_account {
            Some((name, password)) => request.basic_auth(name, Some(password)),
            None => request,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        debug!(method, endpoint = %self.path, "API request");

        let response = self
            .apply_auth(request)
            .headers(self.header_map()?)
            .send()
            .await
            .map_err(|e| self.api_error(method, &e.to_string()))?
            .error_for_status()
            .map_err(|e| self.api_error(method, &e.to_string()))?;

        debug!(method, endpoint = %self.path, status = %response.status(), "API response");

        response
            .json::<T>()
            .await
            .map_err(|e| self.api_error(method, &e.to_string()))
    }

    /// Perform a GET request and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::ApiError`] on transport failure, non-success
    /// status, or an undecodable body.
    pub async fn get<T: DeserializeOwned>(&self) -> Result<T> {
        self.execute("GET", self.http.get(self.url())).await
    }

    /// Perform a POST request with a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::ApiError`] on transport failure, non-success
    /// status, or an undecodable body.
    pub async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, body: &B) -> Result<T> {
        self.execute("POST", self.http.post(self.url()).json(body))
            .await
    }

    /// Perform a PUT request with a JSON body and decode the response.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::ApiError`] on transport failure, non-success
    /// status, or an undecodable body.
    pub async fn put<B: Serialize + Sync, T: DeserializeOwned>(&self, body: &B) -> Result<T> {
        self.execute("PUT", self.http.put(self.url()).json(body))
            .await
    }

    /// Perform a DELETE request, ignoring any response body.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::ApiError`] on transport failure or non-success
    /// status.
    pub async fn delete(&self) -> Result<()> {
        let method = "DELETE";
        debug!(method, endpoint = %self.path, "API request");

        self.apply_auth(self.http.delete(self.url()))
            .headers(self.header_map()?)
            .send()
            .await
            .map_err(|e| self.api_error(method, &e.to_string()))?
            .error_for_status()
            .map_err(|e| self.api_error(method, &e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(ApiConfig::new("https://api.example.com/v2/".to_string())).unwrap()
    }

    #[test]
    fn path_args_fill_placeholders_in_order() {
        let endpoint = client()
            .endpoint("athletes/{}/testings/{}")
            .with_path_args(&["42", "7"]);
        assert_eq!(endpoint.path(), "athletes/42/testings/7");
    }

    #[test]
    fn all_empty_path_args_strip_placeholder_segments() {
        let endpoint = client()
            .endpoint("athletes/{}/testings")
            .with_path_args(&[""]);
        assert_eq!(endpoint.path(), "athletes/testings");
    }

    #[test]
    fn url_joins_base_and_path_with_single_slash() {
        let endpoint = client().endpoint("/athletes/testings");
        assert_eq!(
            endpoint.url(),
            "https://api.example.com/v2/athletes/testings"
        );
    }

    #[test]
    fn headers_accumulate() {
        let endpoint = client()
            .endpoint("athletes")
            .header("x-request-id", "abc")
            .header("accept-language", "en");
        let map = endpoint.header_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("x-request-id").unwrap(), "abc");
    }

    #[test]
    fn invalid_header_is_reported_with_endpoint_path() {
        let endpoint = client().endpoint("athletes").header("bad header", "x");
        let err = endpoint.header_map().unwrap_err();
        assert!(matches!(err, HubError::ApiError { ref endpoint, .. } if endpoint == "athletes"));
    }
}
