//! HTTP transport for Nebraska API calls
//!
//! Builds requests against the configured endpoint, attaches authentication
//! and User-Agent headers, serializes bodies as JSON and maps response
//! status codes to typed errors. Holds no mutable state between calls, so
//! one client can be shared freely across tasks.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::Config;
use crate::error::Error;

/// Authentication mode, fixed at client construction.
#[derive(Debug, Clone)]
enum Auth {
    Basic { username: String, password: String },
    Bearer(String),
    None,
}

/// HTTP client for a Nebraska server.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
    auth: Auth,
}

impl Client {
    /// Create a new client from the given configuration.
    ///
    /// The endpoint must be a valid http(s) URL. Basic credentials win over
    /// a bearer token when both are configured.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let endpoint = config.effective_endpoint();
        let parsed = Url::parse(endpoint)
            .map_err(|_| Error::Validation(format!("endpoint: not a valid URL: {endpoint}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Error::Validation(format!(
                "endpoint: not an HTTP or HTTPS URL: {endpoint}"
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(config.effective_user_agent())
            .build()?;

        let auth = match (&config.username, &config.password, &config.bearer_token) {
            (Some(username), Some(password), _)
                if !username.is_empty() && !password.is_empty() =>
            {
                Auth::Basic {
                    username: username.clone(),
                    password: password.clone(),
                }
            }
            (_, _, Some(token)) if !token.is_empty() => Auth::Bearer(token.clone()),
            _ => Auth::None,
        };

        Ok(Self {
            base_url: endpoint.trim_end_matches('/').to_string(),
            http,
            auth,
        })
    }

    /// Build a request for the given method and path.
    ///
    /// The path is joined to the configured endpoint, gaining a leading
    /// slash if it lacks one. A body, when present, is serialized as JSON.
    pub fn request<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Request, Error> {
        let url = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };

        tracing::debug!("{} {}", method, url);

        let mut builder = self
            .http
            .request(method, url.as_str())
            .header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            builder = builder.json(body);
        }

        builder = match &self.auth {
            Auth::Basic { username, password } => builder.basic_auth(username, Some(password)),
            Auth::Bearer(token) => builder.bearer_auth(token),
            Auth::None => builder,
        };

        Ok(builder.build()?)
    }

    /// Execute a request and decode the response.
    ///
    /// A 404 maps to [`Error::NotFound`]; any other non-2xx status maps to
    /// [`Error::BadResponse`] carrying the URL, status code, and raw body.
    /// On success a non-empty body is decoded as JSON; an empty body yields
    /// `None`.
    pub async fn perform<T: DeserializeOwned>(&self, request: Request) -> Result<Option<T>, Error> {
        let url = request.url().to_string();

        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound);
        }
        if !status.is_success() {
            return Err(Error::BadResponse {
                url,
                status: status.as_u16(),
                body,
            });
        }

        if body.is_empty() {
            return Ok(None);
        }

        Ok(Some(serde_json::from_str(&body)?))
    }

    /// Build and execute a request in one call.
    pub async fn execute<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, Error> {
        let request = self.request(method, path, body)?;
        self.perform(request).await
    }

    /// GET a single JSON object. An empty 2xx body is treated as not found.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.execute::<(), T>(Method::GET, path, None)
            .await?
            .ok_or(Error::NotFound)
    }

    /// POST a JSON body and decode the JSON response.
    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.execute(Method::POST, path, Some(body))
            .await?
            .ok_or(Error::NotFound)
    }

    /// PUT a JSON body and decode the JSON response.
    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        self.execute(Method::PUT, path, Some(body))
            .await?
            .ok_or(Error::NotFound)
    }

    /// DELETE, ignoring any response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        self.execute::<(), serde_json::Value>(Method::DELETE, path, None)
            .await?;
        Ok(())
    }
}
