use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use log::*;
use std::collections::HashSet;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// POST one message per form key to every subscriber of `topic`.
///
/// Form values are ignored. A body that isn't form encoded publishes nothing
/// and still succeeds.
pub async fn publish(
    State(app_state): State<AppState>,
    Path(topic): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let payloads = form_keys(&headers, &body);

    for payload in &payloads {
        let sequence = app_state.broker.publish(&topic, payload).await;
        trace!("Published message {sequence} on topic {topic}");
    }

    debug!("Published {} message(s) on topic {topic}", payloads.len());

    StatusCode::NO_CONTENT
}

/// Distinct form keys in the order they first appear in the body.
fn form_keys(headers: &HeaderMap, body: &[u8]) -> Vec<String> {
    if !is_form_urlencoded(headers) {
        debug!("Ignoring publish body that is not {FORM_URLENCODED}");
        return Vec::new();
    }

    let mut seen = HashSet::new();
    url::form_urlencoded::parse(body)
        .map(|(key, _value)| key.into_owned())
        .filter(|key| seen.insert(key.clone()))
        .collect()
}

fn is_form_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
}
