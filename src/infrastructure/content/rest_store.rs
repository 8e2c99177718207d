//! Hosted PostgREST content store and analytics stream.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::entities::{AnalyticsEvent, AnalyticsSummary, BlogPost, PostId};
use crate::domain::errors::ContentError;
use crate::domain::ports::{AnalyticsPort, ContentBackend, ContentStorePort};

const REST_PATH: &str = "rest/v1";
const POSTS_TABLE: &str = "posts";
const EVENTS_TABLE: &str = "analytics_events";
const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=minimal";
const USER_AGENT: &str = concat!("studio-press/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Shared HTTP plumbing for the hosted tables.
#[derive(Clone)]
struct RestClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    fn new(base_url: &str, api_key: &str) -> Result<Self, ContentError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(15))
            .build()
            .map_err(|e| ContentError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{REST_PATH}/{table}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ContentError> {
        let response = self.authorize(request).send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach content store");
            if e.is_timeout() {
                ContentError::network("request timed out")
            } else if e.is_connect() {
                ContentError::network("failed to connect to content store")
            } else {
                ContentError::network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Self::handle_error_response(status, response).await)
        }
    }

    async fn handle_error_response(status: StatusCode, response: Response) -> ContentError {
        let message = match response.json::<ErrorResponse>().await {
            Ok(error) => error.message,
            Err(_) => format!("HTTP {status}"),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ContentError::Rejected {
                status: status.as_u16(),
                message: format!("access denied: {message}"),
            },
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                ContentError::network("content store is temporarily unavailable")
            }
            _ => ContentError::Rejected {
                status: status.as_u16(),
                message,
            },
        }
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ContentError> {
        response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse content store response");
            ContentError::invalid_response(e.to_string())
        })
    }
}

/// Content store talking to the hosted `posts` table.
pub struct RestContentStore {
    rest: RestClient,
}

impl RestContentStore {
    /// Creates a store for the project at `base_url`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ContentError> {
        Ok(Self {
            rest: RestClient::new(base_url, api_key)?,
        })
    }
}

#[async_trait]
impl ContentStorePort for RestContentStore {
    fn backend(&self) -> ContentBackend {
        ContentBackend::Remote
    }

    async fn list_posts(&self) -> Result<Vec<BlogPost>, ContentError> {
        let request = self
            .rest
            .client
            .get(self.rest.table_url(POSTS_TABLE))
            .query(&[("select", "*"), ("order", "created_at.desc")]);

        let posts: Vec<BlogPost> = RestClient::parse(self.rest.send(request).await?).await?;
        debug!(count = posts.len(), "Fetched posts from content store");
        Ok(posts)
    }

    async fn get_post(&self, id: &PostId) -> Result<Option<BlogPost>, ContentError> {
        let filter = format!("eq.{id}");
        let request = self
            .rest
            .client
            .get(self.rest.table_url(POSTS_TABLE))
            .query(&[("select", "*"), ("id", filter.as_str())]);

        let posts: Vec<BlogPost> = RestClient::parse(self.rest.send(request).await?).await?;
        Ok(posts.into_iter().next())
    }

    async fn save_post(&self, post: &BlogPost) -> Result<(), ContentError> {
        let request = self
            .rest
            .client
            .post(self.rest.table_url(POSTS_TABLE))
            .header("Prefer", UPSERT_PREFERENCE)
            .json(post);

        self.rest.send(request).await?;
        debug!(post_id = %post.id, "Saved post to content store");
        Ok(())
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), ContentError> {
        let filter = format!("eq.{id}");
        let request = self
            .rest
            .client
            .delete(self.rest.table_url(POSTS_TABLE))
            .query(&[("id", filter.as_str())]);

        self.rest.send(request).await?;
        debug!(post_id = %id, "Deleted post from content store");
        Ok(())
    }
}

/// Analytics adapter for the hosted `analytics_events` table.
pub struct RestAnalytics {
    rest: RestClient,
}

impl RestAnalytics {
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ContentError> {
        Ok(Self {
            rest: RestClient::new(base_url, api_key)?,
        })
    }
}

#[async_trait]
impl AnalyticsPort for RestAnalytics {
    async fn record(&self, event: &AnalyticsEvent) -> Result<(), ContentError> {
        let request = self
            .rest
            .client
            .post(self.rest.table_url(EVENTS_TABLE))
            .header("Prefer", "return=minimal")
            .json(event);
        self.rest.send(request).await?;
        Ok(())
    }

    async fn summary(&self) -> Result<AnalyticsSummary, ContentError> {
        let request = self
            .rest
            .client
            .get(self.rest.table_url(EVENTS_TABLE))
            .query(&[("select", "*")]);

        let events: Vec<AnalyticsEvent> = RestClient::parse(self.rest.send(request).await?).await?;
        Ok(AnalyticsSummary::from_events(&events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(RestContentStore::new("https://example.supabase.co", "key").is_ok());
        assert!(RestAnalytics::new("https://example.supabase.co/", "key").is_ok());
    }

    #[test]
    fn test_table_url_strips_trailing_slash() -> Result<(), ContentError> {
        let rest = RestClient::new("https://example.supabase.co/", "key")?;
        assert_eq!(
            rest.table_url(POSTS_TABLE),
            "https://example.supabase.co/rest/v1/posts"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() -> Result<(), ContentError> {
        let store = RestContentStore::new("http://127.0.0.1:9", "key")?;
        let err = store.list_posts().await.expect_err("nothing listens on port 9");
        assert!(err.is_unreachable());
        Ok(())
    }
}
