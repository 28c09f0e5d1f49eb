use crate::error::Result;
use crate::AppState;
use async_stream::stream;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use log::*;
use std::convert::Infallible;

/// GET an event stream of every message published to `topic`.
///
/// The stream stays open until the broker evicts the subscription (after its
/// `timeout` event) or shuts down. If the client goes away first, dropping the
/// stream drops the subscription, which unregisters it.
pub(crate) async fn sse_handler(
    State(app_state): State<AppState>,
    Path(topic): Path<String>,
) -> Result<impl IntoResponse> {
    debug!("Establishing event stream on topic {topic}");

    let mut subscription = app_state.broker.subscribe(topic).await?;

    let stream = stream! {
        while let Some(message) = subscription.recv().await {
            trace!(
                "Streaming {} event {} to subscription {}",
                message.kind(),
                message.sequence(),
                subscription.id()
            );
            yield Ok::<Event, Infallible>(Event::from(&message));
        }

        debug!("Event stream for subscription {} closed", subscription.id());
    };

    Ok(([(header::CONNECTION, "keep-alive")], Sse::new(stream)))
}
