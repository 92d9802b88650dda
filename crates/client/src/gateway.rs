use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use common::types::{ProviderProfile, UpdateProfileInput};
use common::ActionOutcome;

use crate::errors::ClientError;

/// Profile actions as seen from the form.
#[async_trait]
pub trait ProfileGateway: Send + Sync {
    async fn get_profile(&self, user_id: &str) -> Result<ActionOutcome<ProviderProfile>, ClientError>;
    async fn update_profile(&self, input: UpdateProfileInput) -> Result<ActionOutcome<ProviderProfile>, ClientError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    message: Option<String>,
}

/// Build `base` + segments, percent-encoding each segment.
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) fn parse_base(base_url: &str) -> Result<Url, ClientError> {
    Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))
}

pub(crate) fn http_client() -> Result<reqwest::Client, ClientError> {
    Ok(reqwest::Client::builder().timeout(Duration::from_secs(30)).build()?)
}

/// Human readable message from an error response body.
pub(crate) async fn error_message(res: Response) -> String {
    let status = res.status();
    match res.json::<ErrorBody>().await {
        Ok(body) => body.message.unwrap_or(body.error),
        Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
    }
}

/// 404 and 409 are reported outcomes; other failures are errors.
async fn read_outcome<T: DeserializeOwned>(res: Response) -> Result<ActionOutcome<T>, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(ActionOutcome::Ok(res.json::<T>().await?));
    }
    let message = error_message(res).await;
    debug!(%status, %message, "gateway_non_success");
    match status {
        StatusCode::NOT_FOUND => Ok(ActionOutcome::NotFound(message)),
        StatusCode::CONFLICT => Ok(ActionOutcome::Conflict(message)),
        _ => Err(ClientError::Server { status: status.as_u16(), message }),
    }
}

/// `ProfileGateway` over the marketplace HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    base: Url,
    http: reqwest::Client,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self { base: parse_base(base_url)?, http: http_client()? })
    }
}

#[async_trait]
impl ProfileGateway for HttpGateway {
    #[instrument(skip(self))]
    async fn get_profile(&self, user_id: &str) -> Result<ActionOutcome<ProviderProfile>, ClientError> {
        let url = endpoint(&self.base, &["api", "providers", user_id, "profile"])?;
        read_outcome(self.http.get(url).send().await?).await
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    async fn update_profile(&self, input: UpdateProfileInput) -> Result<ActionOutcome<ProviderProfile>, ClientError> {
        let url = endpoint(&self.base, &["api", "providers", &input.user_id, "profile"])?;
        read_outcome(self.http.put(url).json(&input).send().await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_encode_segments() {
        let base = parse_base("http://localhost:8080/").unwrap();
        let url = endpoint(&base, &["api", "providers", "user 1/x", "profile"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/providers/user%201%2Fx/profile");

        let prefixed = parse_base("http://h/app").unwrap();
        assert_eq!(endpoint(&prefixed, &["api", "media"]).unwrap().as_str(), "http://h/app/api/media");
    }

    #[test]
    fn rejects_bad_base() {
        assert!(matches!(HttpGateway::new("not a url"), Err(ClientError::InvalidUrl(_))));
    }
}
