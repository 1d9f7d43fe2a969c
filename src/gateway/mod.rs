//! Typed requests to the backend's REST API.
//!
//! Every request goes through [Gateway::send], which attaches the session's
//! credential token, classifies the response status into [Error] variants,
//! and clears the session when the backend rejects the credentials.

mod auth;
mod budgets;
mod transactions;

use reqwest::{
    Client, Method, StatusCode, Url,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    Error,
    config::ClientConfig,
    endpoints,
    logging::{log_request, log_response},
    session::{SessionStore, SessionTicket},
};

pub use auth::UserProfile;

/// The connectivity status shown when the backend cannot be reached.
pub const CONNECTION_ERROR_STATUS: &str = "Connection Error";

/// The client's single point of contact with the backend.
///
/// Cloning a gateway is cheap, clones share the HTTP connection pool and the
/// session.
#[derive(Debug, Clone)]
pub struct Gateway {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl Gateway {
    /// Create a gateway for the backend at `config.api_base_url`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidUrl] if the base URL cannot be parsed, or an
    /// [Error::NetworkFailure] if the HTTP client could not be built.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, Error> {
        let http = Client::builder().timeout(config.request_timeout).build()?;

        Self::with_client(http, &config.api_base_url, session)
    }

    /// Create a gateway that sends requests with a preconfigured `http` client.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidUrl] if `base_url` cannot be parsed.
    pub fn with_client(http: Client, base_url: &str, session: SessionStore) -> Result<Self, Error> {
        let base_url = base_url.trim().trim_end_matches('/');
        Url::parse(base_url).map_err(|_| Error::InvalidUrl(base_url.to_owned()))?;

        Ok(Self {
            http,
            base_url: base_url.to_owned(),
            session,
        })
    }

    /// The session the gateway authenticates requests with.
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Fetch the plain-text greeting of the connectivity probe.
    pub async fn check_connection(&self) -> Result<String, Error> {
        let url = self.endpoint_url(endpoints::TEST)?;

        self.send(Method::GET, url, None).await
    }

    /// A one-line connectivity status: "Connected: <greeting>" or
    /// [CONNECTION_ERROR_STATUS].
    pub async fn connection_status(&self) -> String {
        match self.check_connection().await {
            Ok(greeting) => format!("Connected: {}", greeting.trim()),
            Err(error) => {
                tracing::warn!("Connectivity probe failed: {error}");
                CONNECTION_ERROR_STATUS.to_owned()
            }
        }
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        let url = format!("{}{}", self.base_url, path);

        Url::parse(&url).map_err(|_| Error::InvalidUrl(url))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        let body = self.send(Method::GET, url, None).await?;

        decode(&body)
    }

    async fn send_json<P: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        payload: &P,
    ) -> Result<T, Error> {
        let payload =
            serde_json::to_string(payload).map_err(|error| Error::EncodeRequest(error.to_string()))?;
        let body = self.send(method, url, Some(payload)).await?;

        decode(&body)
    }

    /// Send a request under the current session and return the response body.
    ///
    /// A response is only returned if the session it was issued under is
    /// still current when it arrives, otherwise it is discarded as
    /// [Error::StaleSession]. A 401 or 403 clears the session once and is
    /// never retried.
    async fn send(&self, method: Method, url: Url, body: Option<String>) -> Result<String, Error> {
        let ticket = self.session.ticket()?;
        let headers = self.request_headers(&ticket, body.is_some())?;

        log_request(&method, url.as_str(), &headers, body.as_deref());

        let mut request = self.http.request(method.clone(), url.clone()).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                self.discard_if_stale(&ticket)?;
                tracing::error!("Request {method} {url} failed: {error}");
                return Err(error.into());
            }
        };

        let status = response.status();
        let text = response.text().await?;
        log_response(&method, url.as_str(), status, &text);

        self.discard_if_stale(&ticket)?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return if self.session.invalidate(&ticket)? {
                Err(Error::AuthorizationFailure {
                    status: status.as_u16(),
                })
            } else {
                Err(Error::StaleSession)
            };
        }

        if status.is_client_error() {
            return Err(Error::ValidationFailure {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        if status.is_server_error() {
            return Err(Error::ServerFailure {
                status: status.as_u16(),
                message: error_message(status, &text),
            });
        }

        if !status.is_success() {
            return Err(Error::UnexpectedResponse(format!(
                "unexpected status {status} from {method} {url}"
            )));
        }

        Ok(text)
    }

    fn request_headers(&self, ticket: &SessionTicket, has_body: bool) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if has_body {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        if let Some(token) = &ticket.token {
            let Ok(mut value) = HeaderValue::from_str(token.as_str()) else {
                tracing::error!("The stored credential token is not a valid header value.");
                self.session.invalidate(ticket)?;
                return Err(Error::InvalidCredentialToken);
            };
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    fn discard_if_stale(&self, ticket: &SessionTicket) -> Result<(), Error> {
        if self.session.is_current(ticket)? {
            Ok(())
        } else {
            tracing::debug!("Discarding a response for a session that has ended.");
            Err(Error::StaleSession)
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|error| Error::UnexpectedResponse(error.to_string()))
}

#[derive(Deserialize)]
struct ErrorPayload {
    message: Option<String>,
    error: Option<String>,
}

/// Pick the message to show for a rejected request.
///
/// Prefers the `message` (or `error`) field of a JSON body, then a plain-text
/// body, then the status' reason phrase.
fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();

    if let Ok(payload) = serde_json::from_str::<ErrorPayload>(body) {
        if let Some(message) = payload
            .message
            .or(payload.error)
            .filter(|message| !message.trim().is_empty())
        {
            return message;
        }
    } else if !body.is_empty() && !body.starts_with(['{', '[']) {
        return body.to_owned();
    }

    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_owned()
}
