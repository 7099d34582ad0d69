//! Local HTTP upstream for exercising the fetcher and catalog end to end.

#![allow(dead_code)]

use axum::extract::{RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// What the upstream saw for one request
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub query: Option<String>,
    pub user_agent: Option<String>,
}

struct Canned {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    calls: AtomicUsize,
    seen: Mutex<Vec<SeenRequest>>,
}

/// Answers every request with the same status and body
pub struct MockUpstream {
    pub base_url: String,
    canned: Arc<Canned>,
}

impl MockUpstream {
    pub async fn html(status: u16, body: impl Into<String>) -> Self {
        Self::start(status, "text/html; charset=utf-8", body.into()).await
    }

    pub async fn json(body: serde_json::Value) -> Self {
        Self::start(200, "application/json", body.to_string()).await
    }

    async fn start(status: u16, content_type: &'static str, body: String) -> Self {
        let canned = Arc::new(Canned {
            status: StatusCode::from_u16(status).unwrap(),
            content_type,
            body,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(respond).with_state(canned.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            canned,
        }
    }

    pub fn calls(&self) -> usize {
        self.canned.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.canned.seen.lock().unwrap().clone()
    }
}

async fn respond(
    State(canned): State<Arc<Canned>>,
    uri: Uri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> impl IntoResponse {
    canned.calls.fetch_add(1, Ordering::SeqCst);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    canned.seen.lock().unwrap().push(SeenRequest {
        path: uri.path().to_string(),
        query,
        user_agent,
    });

    (
        canned.status,
        [(header::CONTENT_TYPE, canned.content_type)],
        canned.body.clone(),
    )
}

/// One review card in the site's markup
pub fn review_card(rating: Option<&str>, title: Option<&str>, content: &str) -> String {
    let rating = rating
        .map(|r| format!(r#"<span class="ipc-rating-star ipc-rating-star--rating">{r}</span>"#))
        .unwrap_or_default();
    let title = title
        .map(|t| format!(r#"<h3 class="ipc-title__text ipc-title__text--reduced">{t}</h3>"#))
        .unwrap_or_default();
    format!(
        r#"<article><div class="ipc-list-card__content">{rating}{title}<div class="ipc-html-content"><div class="ipc-html-content-inner-div">{content}</div></div></div></article>"#
    )
}

pub fn review_page(cards: &[String]) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>Reviews</title></head><body><main>{}</main></body></html>",
        cards.concat()
    )
}
