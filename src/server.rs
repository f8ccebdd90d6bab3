//! HTTP front end of the article service.

use std::{future::Future, time::Duration};

use anyhow::Context;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;

use crate::{ArcStr, log::Log, model::Article, service::ArticleService};


const SCOPE: &str = "server";

/// Path of the only endpoint.
pub const ARTICLES_PATH: &str = "/articles/feed";

/// Errors returned to HTTP clients as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error("feed_url is required")]
    MissingFeedUrl,
    #[error("{0:#}")]
    Service(anyhow::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidBody(_) | Self::MissingFeedUrl => StatusCode::BAD_REQUEST,
            Self::Service(_) | Self::Timeout(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct ArticlesRequest {
    #[serde(default)]
    feed_url: Option<String>,
}

/// Shared by every request handler.
#[derive(Debug, Clone)]
pub struct AppState {
    service: ArticleService,
    /// Upper bound on the time spent answering one request
    timeout: Duration,
    log: Log,
}

/// Serves [`ArticleService::get_articles`] over HTTP.
///
/// # Examples
/// ```ignore
/// Server::new("127.0.0.1:8080".into(), Duration::from_secs(10), service, log)
///     .start()
///     .await?;
/// ```
pub struct Server {
    address: ArcStr,
    state: AppState,
}

impl Server {
    /// Requests taking longer than `timeout` are answered with an error.
    pub fn new(address: ArcStr, timeout: Duration, service: ArticleService, log: Log) -> Self {
        Self {
            address,
            state: AppState {
                service,
                timeout,
                log,
            },
        }
    }

    /// Binds the configured address and serves until Ctrl-C is pressed.
    /// In-flight requests are completed before this returns.
    pub async fn start(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.address.as_str())
            .await
            .with_context(|| format!("Binding {}", self.address))?;
        let log = self.state.log.clone();
        self.serve(listener, shutdown_signal(log)).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let log = self.state.log.clone();
        let address = listener.local_addr().context("Reading the bound address")?;
        log.info(SCOPE, format!("Listening on {}", address));

        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .context("Serving HTTP")?;

        log.info(SCOPE, "Server stopped");
        Ok(())
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(ARTICLES_PATH, get(articles).post(articles))
        .with_state(state)
}

/// Reads `{"feed_url": "..."}` from the body of a GET or POST. The body is
/// decoded whatever its `Content-Type`.
async fn articles(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<Article>>, ApiError> {
    let request = state
        .log
        .info_on_error(SCOPE, serde_json::from_slice::<ArticlesRequest>(&body))?;

    let feed_url = match request.feed_url {
        Some(url) if !url.trim().is_empty() => ArcStr::from(url),
        _ => return Err(ApiError::MissingFeedUrl),
    };

    let pending = state.service.get_articles(feed_url.clone());
    match tokio::time::timeout(state.timeout, pending).await {
        Ok(Ok(articles)) => Ok(Json(articles.to_vec())),
        Ok(Err(err)) => {
            state.log.error(
                SCOPE,
                format!("Getting articles for {}: {:#}", feed_url, err),
            );
            Err(ApiError::Service(err))
        }
        Err(_) => {
            state.log.error(
                SCOPE,
                format!("Getting articles for {} timed out", feed_url),
            );
            Err(ApiError::Timeout(state.timeout))
        }
    }
}

async fn shutdown_signal(log: Log) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log.error(SCOPE, format!("Failed to listen for Ctrl-C: {}", err));
        std::future::pending::<()>().await;
    }
    log.info(SCOPE, "Shutting down");
}
