use std::path::Path;

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

use crate::config::AssetMode;

/// Dev-server requests are small; anything bigger is not a page load.
const MAX_PROXY_BODY: usize = 16 * 1024 * 1024;

/// Headers that describe one hop, not the message.
fn hop_by_hop() -> [HeaderName; 5] {
    [
        header::CONNECTION,
        header::HOST,
        header::TRANSFER_ENCODING,
        header::UPGRADE,
        header::TE,
    ]
}

/// Attaches frontend serving to everything `api` does not route.
pub fn with_assets(api: Router, mode: &AssetMode) -> Router {
    match mode {
        AssetMode::Static { dist_dir } => {
            info!("Serving static assets from {}", dist_dir.display());
            api.fallback_service(static_files(dist_dir))
        }
        AssetMode::DevProxy { upstream } => {
            info!("Proxying frontend requests to {}", upstream);
            let proxy = DevProxy::new(upstream);
            api.fallback(move |req: Request| {
                let proxy = proxy.clone();
                async move { proxy.forward(req).await }
            })
        }
    }
}

/// Files under `dist_dir`; any path without a file gets `index.html` so the
/// client-side router can resolve it.
pub fn static_files(dist_dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dist_dir).fallback(ServeFile::new(dist_dir.join("index.html")))
}

#[derive(Clone)]
pub struct DevProxy {
    client: reqwest::Client,
    upstream: String,
}

impl DevProxy {
    pub fn new(upstream: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            upstream: upstream.trim_end_matches('/').to_string(),
        }
    }

    pub async fn forward(&self, req: Request) -> Response {
        let path = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let url = format!("{}{}", self.upstream, path);

        let (parts, body) = req.into_parts();
        let body = match axum::body::to_bytes(body, MAX_PROXY_BODY).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Dev proxy could not read request body: {}", e);
                return StatusCode::PAYLOAD_TOO_LARGE.into_response();
            }
        };

        let upstream = self
            .client
            .request(parts.method, &url)
            .headers(end_to_end(&parts.headers))
            .body(body)
            .send()
            .await;

        match upstream {
            Ok(resp) => {
                let status = resp.status();
                let headers = end_to_end(resp.headers());
                let mut response = Response::new(Body::from_stream(resp.bytes_stream()));
                *response.status_mut() = status;
                *response.headers_mut() = headers;
                response
            }
            Err(e) => {
                warn!("Dev server unreachable at {}: {}", url, e);
                (StatusCode::BAD_GATEWAY, "frontend dev server unavailable").into_response()
            }
        }
    }
}

fn end_to_end(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    for name in hop_by_hop() {
        out.remove(name);
    }
    out
}
