use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::parser::parse_frameworks;
use crate::catalog::Catalog;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed returned status {status}")]
    Status { status: u16 },
}

/// Fetches the framework CSV feed. One GET per call, no retry.
#[derive(Clone)]
pub struct FeedLoader {
    client: Client,
    url: String,
}

impl FeedLoader {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }

    pub async fn load(&self) -> Result<Catalog, FeedError> {
        debug!("Fetching framework feed from {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let catalog = Catalog::new(parse_frameworks(&body));

        if catalog.is_empty() {
            warn!("Framework feed contained no records");
        } else {
            info!("Framework feed loaded: {} records", catalog.len());
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_mock;
    use axum::{http::StatusCode, routing::get, Router};

    #[tokio::test]
    async fn test_load_parses_feed() {
        let app = Router::new().route(
            "/feed.csv",
            get(|| async { "id,name,objectives\na,Alpha,Sales\nb,Beta,\"Trust|Sales\"\n" }),
        );
        let base = spawn_mock(app).await;

        let loader = FeedLoader::new(Client::new(), format!("{base}/feed.csv"));
        let catalog = loader.load().await.unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("b").unwrap().objectives, vec!["Trust", "Sales"]);
    }

    #[tokio::test]
    async fn test_load_rejects_non_success_status() {
        let app = Router::new().route(
            "/feed.csv",
            get(|| async { (StatusCode::NOT_FOUND, "gone") }),
        );
        let base = spawn_mock(app).await;

        let loader = FeedLoader::new(Client::new(), format!("{base}/feed.csv"));
        let err = loader.load().await.unwrap_err();

        assert!(matches!(err, FeedError::Status { status: 404 }));
    }
}
