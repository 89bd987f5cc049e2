use crate::adapters::items_from_json;
use crate::domain::model::RawItem;
use crate::domain::ports::ApiRequest;
use crate::utils::error::{GradeError, Result};
use chrono::{DateTime, TimeZone, Utc};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";
const RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

/// Single-request timeline fetch. Upstream refusals surface as distinct error kinds;
/// nothing here retries or waits.
pub struct ApiSource {
    client: Client,
}

impl Default for ApiSource {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl ApiSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, request: &ApiRequest) -> Result<Vec<RawItem>> {
        tracing::debug!("Making API request to: {}", request.endpoint);

        let response = self
            .client
            .get(&request.endpoint)
            .query(&query_params(request))
            .timeout(Duration::from_secs(request.timeout_seconds))
            .send()
            .await?;

        let status = response.status();
        let remaining = header_str(response.headers(), RATE_LIMIT_REMAINING).unwrap_or("unknown");
        tracing::info!(
            "{} resulted in a {} response. Requests remaining: {}",
            request.subject,
            status.as_u16(),
            remaining
        );

        match status {
            StatusCode::NOT_FOUND => Err(GradeError::SubjectNotFound {
                subject: request.subject.clone(),
            }),
            StatusCode::UNAUTHORIZED => Err(GradeError::AccessRevoked {
                subject: request.subject.clone(),
            }),
            StatusCode::TOO_MANY_REQUESTS => Err(GradeError::RateLimited {
                subject: request.subject.clone(),
                reset_at: rate_limit_reset(response.headers()),
            }),
            s if s.is_success() => {
                let json: serde_json::Value = response.json().await?;
                items_from_json(json, &request.fields)
            }
            s => Err(GradeError::UpstreamStatus { status: s.as_u16() }),
        }
    }
}

// 每次請求都重新建立參數，不共用可變狀態
fn query_params(request: &ApiRequest) -> Vec<(&'static str, String)> {
    vec![
        ("screen_name", request.subject.clone()),
        ("count", request.max_items.to_string()),
        ("trim_user", "true".to_string()),
        ("exclude_replies", request.exclude_replies.to_string()),
        ("include_rts", request.include_reposts.to_string()),
        ("tweet_mode", "extended".to_string()),
    ]
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    header_str(headers, RATE_LIMIT_RESET)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}
