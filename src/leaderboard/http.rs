//! REST leaderboard backend (browser fetch)

use futures::future::LocalBoxFuture;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::{LeaderboardBackend, LeaderboardEntry, parse_rows};
use crate::error::LeaderboardError;
use crate::settings::LeaderboardConfig;

/// Supabase-style table: `GET`/`POST {url}/rest/v1/{table}`
#[derive(Debug, Clone)]
pub struct HttpLeaderboard {
    config: LeaderboardConfig,
}

impl HttpLeaderboard {
    pub fn new(config: LeaderboardConfig) -> Self {
        Self { config }
    }

    fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.url.trim_end_matches('/'),
            self.config.table
        )
    }
}

impl LeaderboardBackend for HttpLeaderboard {
    fn fetch_top(
        &self,
        limit: usize,
    ) -> LocalBoxFuture<'static, Result<Vec<LeaderboardEntry>, LeaderboardError>> {
        let url = format!(
            "{}?select=name,score,created_at&order=score.desc,created_at.asc&limit={limit}",
            self.table_url()
        );
        let api_key = self.config.api_key.clone();
        Box::pin(async move {
            let request = build_request("GET", &url, &api_key, None)?;
            let response = send(request).await?;
            let body = read_text(&response).await?;
            let payload: serde_json::Value = serde_json::from_str(&body)
                .map_err(|e| LeaderboardError::Malformed(e.to_string()))?;
            let mut entries = parse_rows(&payload)?;
            entries.truncate(limit);
            Ok(entries)
        })
    }

    fn submit(&self, name: &str, score: u64) -> LocalBoxFuture<'static, Result<(), LeaderboardError>> {
        let url = self.table_url();
        let api_key = self.config.api_key.clone();
        let body = serde_json::json!({ "name": name, "score": score }).to_string();
        Box::pin(async move {
            let request = build_request("POST", &url, &api_key, Some(&body))?;
            send(request).await?;
            Ok(())
        })
    }
}

fn build_request(
    method: &str,
    url: &str,
    api_key: &str,
    body: Option<&str>,
) -> Result<Request, LeaderboardError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(body));
    }

    let request = Request::new_with_str_and_init(url, &opts).map_err(transport)?;
    let headers = request.headers();
    headers.set("apikey", api_key).map_err(transport)?;
    headers
        .set("Authorization", &format!("Bearer {api_key}"))
        .map_err(transport)?;
    if body.is_some() {
        headers.set("Content-Type", "application/json").map_err(transport)?;
        headers.set("Prefer", "return=minimal").map_err(transport)?;
    }
    Ok(request)
}

/// Fetch and reject non-2xx responses with the body as the message
async fn send(request: Request) -> Result<Response, LeaderboardError> {
    let window = web_sys::window().ok_or_else(|| LeaderboardError::Transport("no window".into()))?;
    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?;
    let response: Response = value
        .dyn_into()
        .map_err(|_| LeaderboardError::Malformed("fetch did not return a Response".into()))?;

    if !response.ok() {
        let message = read_text(&response).await.unwrap_or_default();
        return Err(LeaderboardError::Rejected {
            status: response.status(),
            message,
        });
    }
    Ok(response)
}

async fn read_text(response: &Response) -> Result<String, LeaderboardError> {
    let text = JsFuture::from(response.text().map_err(transport)?)
        .await
        .map_err(transport)?;
    text.as_string()
        .ok_or_else(|| LeaderboardError::Malformed("response body is not text".into()))
}

fn transport(err: JsValue) -> LeaderboardError {
    LeaderboardError::Transport(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}
