//! Client for the events backend API
//!
//! Thin wrappers over `reqwest`: build the URL, attach the bearer token when
//! the call is authenticated, classify the status, decode the JSON body.
//! Nothing is cached and nothing is retried.

mod error;
pub mod query;

use std::time::Duration;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use reqwest::{multipart, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::Event;
use crate::session::SessionToken;

pub use error::{ApiError, ErrorKind, GENERIC_MESSAGE, UNAUTHORIZED_MESSAGE};

/// An image file received from the browser, on its way to the upload endpoint
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Handle to the backend. Cheap to clone; the connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url =
            Url::parse(base_url).with_context(|| format!("Invalid API URL: {}", base_url))?;
        if base_url.cannot_be_a_base() {
            bail!("API URL must be hierarchical: {}", base_url);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/a/b/...` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(req: RequestBuilder, token: Option<&SessionToken>) -> RequestBuilder {
        match token {
            Some(token) => req.bearer_auth(token.as_str()),
            None => req,
        }
    }

    /// Send and return the response if its status is 2xx
    async fn execute(&self, req: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_response(status, &body);
        tracing::warn!("Backend answered {}: {}", status, err);
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        token: Option<&SessionToken>,
    ) -> Result<T, ApiError> {
        tracing::debug!("GET {}", url);
        let req = Self::authorize(self.client.get(url), token);
        let response = self.execute(req).await?;
        Self::decode(response).await
    }

    /// `GET /events/me`: events owned by the token's user
    pub async fn my_events(&self, token: Option<&SessionToken>) -> Result<Vec<Event>, ApiError> {
        self.get_json(self.endpoint(&["events", "me"]), token).await
    }

    /// `GET /events/{id}`
    pub async fn event(&self, id: &str) -> Result<Event, ApiError> {
        self.get_json(self.endpoint(&["events", id]), None).await
    }

    /// `GET /events?_sort=date:ASC`
    pub async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        let mut url = self.endpoint(&["events"]);
        query::append_date_sort(&mut url);
        self.get_json(url, None).await
    }

    /// `GET /events?slug={slug}`, first match
    pub async fn event_by_slug(&self, slug: &str) -> Result<Option<Event>, ApiError> {
        let mut url = self.endpoint(&["events"]);
        query::append_slug_filter(&mut url, slug);
        let events: Vec<Event> = self.get_json(url, None).await?;
        Ok(events.into_iter().next())
    }

    /// `GET /events?_where[_or]...`: events whose name, performers,
    /// description or venue contain `term`
    pub async fn search_events(&self, term: &str) -> Result<Vec<Event>, ApiError> {
        let mut url = self.endpoint(&["events"]);
        query::append_search_filter(&mut url, term);
        self.get_json(url, None).await
    }

    /// `PUT /events/{id}` with `body` as JSON; returns the updated event
    pub async fn update_event<B: Serialize + ?Sized>(
        &self,
        id: &str,
        body: &B,
        token: Option<&SessionToken>,
    ) -> Result<Event, ApiError> {
        let url = self.endpoint(&["events", id]);
        tracing::debug!("PUT {}", url);
        let req = Self::authorize(self.client.put(url).json(body), token);
        let response = self.execute(req).await?;
        Self::decode(response).await
    }

    /// `DELETE /events/{id}`
    pub async fn delete_event(
        &self,
        id: &str,
        token: Option<&SessionToken>,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(&["events", id]);
        tracing::debug!("DELETE {}", url);
        let req = Self::authorize(self.client.delete(url), token);
        self.execute(req).await?;
        Ok(())
    }

    /// `POST /upload`: attach `upload` as the image of event `id`
    pub async fn upload_event_image(
        &self,
        id: &str,
        upload: ImageUpload,
        token: Option<&SessionToken>,
    ) -> Result<(), ApiError> {
        let mut part = multipart::Part::stream(upload.data).file_name(upload.file_name);
        if let Some(content_type) = upload.content_type.as_deref() {
            part = part.mime_str(content_type)?;
        }
        let form = multipart::Form::new()
            .part("files", part)
            .text("ref", "events")
            .text("refId", id.to_string())
            .text("field", "image");

        let url = self.endpoint(&["upload"]);
        tracing::debug!("POST {} (image for event {})", url, id);
        let req = Self::authorize(self.client.post(url).multipart(form), token);
        self.execute(req).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let api = client("http://localhost:1337");
        assert_eq!(
            api.endpoint(&["events", "me"]).as_str(),
            "http://localhost:1337/events/me"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("https://example.com/api/");
        assert_eq!(
            api.endpoint(&["events", "12"]).as_str(),
            "https://example.com/api/events/12"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let api = client("http://localhost:1337");
        assert_eq!(
            api.endpoint(&["events", "a/b c"]).as_str(),
            "http://localhost:1337/events/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejects_bad_base_urls() {
        assert!(ApiClient::new("not a url", Duration::from_secs(1)).is_err());
        assert!(ApiClient::new("mailto:events@example.com", Duration::from_secs(1)).is_err());
    }
}
