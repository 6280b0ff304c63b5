use std::fmt;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::config::Settings;
use crate::context::Context;
use crate::message::Message;
use crate::Error;

pub const DEFAULT_ENDPOINT: &str = "https://app.mailpace.com/api/v1/send";
pub const TOKEN_HEADER: &str = "MailPace-Server-Token";

// Bytes of a rejected response kept in the error
pub(crate) const MAX_ERROR_BODY: usize = 512;

/// MailPace API client.
///
/// Holds only immutable configuration, so one client can be cloned or
/// shared across tasks and used for concurrent sends.
#[derive(Clone)]
pub struct EmailClient {
    token: String,
    endpoint: String,
    client: reqwest::Client,
}

impl EmailClient {
    /// Create a client. A missing or empty `endpoint` means `DEFAULT_ENDPOINT`.
    pub fn new(token: impl Into<String>, endpoint: Option<&str>) -> Self {
        Self::with_http_client(token, endpoint, reqwest::Client::new())
    }

    /// Like `new`, but reuses an existing HTTP client and its connection pool
    pub fn with_http_client(
        token: impl Into<String>,
        endpoint: Option<&str>,
        client: reqwest::Client,
    ) -> Self {
        let endpoint = match endpoint {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => DEFAULT_ENDPOINT.to_string(),
        };

        Self {
            token: token.into(),
            endpoint,
            client,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.token.clone(), settings.endpoint.as_deref())
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one email.
    ///
    /// Resolves once the API has answered. Only `200 OK` counts as success;
    /// every other status is returned as `Error::RemoteRejected`. If `ctx`
    /// is cancelled or its deadline passes first, the request is abandoned.
    pub async fn send(&self, message: &Message, ctx: &Context) -> Result<(), Error> {
        let body = message.to_json()?;
        let url = reqwest::Url::parse(&self.endpoint)?;

        log::debug!("Sending email from {} to {} via {}", message.from, message.to, url);

        let req = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header(TOKEN_HEADER, &self.token)
            .body(body);

        ctx.run(async move {
            let resp = req.send().await?;
            map_status(resp).await
        })
        .await
    }
}

impl fmt::Debug for EmailClient {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EmailClient")
            .field("token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Drain the response and map its status to a result.
async fn map_status(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();

    if status == StatusCode::OK {
        // Body is ignored, only read so the connection goes back to the pool
        if let Err(e) = resp.bytes().await {
            log::debug!("Failed to drain response body: {}", e);
        }
        return Ok(());
    }

    let body = match resp.text().await {
        Ok(text) => truncate(text, MAX_ERROR_BODY),
        Err(e) => {
            log::debug!("Failed to read rejected response body: {}", e);
            String::new()
        }
    };

    log::debug!("Send rejected with status {}", status);

    Err(Error::RemoteRejected { status, body })
}

fn truncate(mut text: String, max: usize) -> String {
    if text.len() > max {
        let mut end = max;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}
