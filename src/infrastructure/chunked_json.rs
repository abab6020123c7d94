// Chunked NDJSON streaming of live panel updates
use crate::application::panel_store::PanelStore;
use crate::domain::panel::PanelState;
use crate::presentation::render::{render, RenderedPanel};
use async_compression::tokio::bufread::BrotliEncoder;
use axum::body::Body;
use axum::http::{header, Response, StatusCode};
use axum::response::IntoResponse;
use bytes::{BufMut, Bytes, BytesMut};
use futures::stream::Stream;
use futures::StreamExt;
use tokio::io::AsyncReadExt;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

/// Set on compressed streams; the chunks are encoded, not the HTTP body.
pub const CHUNK_ENCODING_HEADER: &str = "x-chunk-encoding";

/// Create a chunked response with one JSON document per line.
///
/// Compressed, every line becomes its own Brotli payload behind a 4-byte
/// big-endian length, since compressed bytes may contain newlines.
pub fn chunked_json_stream<S>(stream: S, compress: bool) -> Result<Response<Body>, StatusCode>
where
    S: Stream<Item = RenderedPanel> + Send + 'static,
{
    let byte_stream = stream.then(move |panel| serialize_chunk(panel, compress));

    // No Content-Encoding: clients would try to decode the whole body
    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::VARY, "accept-encoding");
    response = if compress {
        response
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header(CHUNK_ENCODING_HEADER, "br")
    } else {
        response.header(header::CONTENT_TYPE, "application/x-ndjson")
    };

    response
        .body(Body::from_stream(byte_stream))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

fn serialize_line(panel: &RenderedPanel) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_vec(panel)?;
    let mut line = BytesMut::with_capacity(json.len() + 1);
    line.put_slice(&json);
    line.put_u8(b'\n');
    Ok(line.freeze())
}

async fn serialize_chunk(panel: RenderedPanel, compress: bool) -> Result<Bytes, std::io::Error> {
    let line = serialize_line(&panel)?;
    if !compress {
        return Ok(line);
    }

    let mut encoder = BrotliEncoder::new(std::io::Cursor::new(line));
    let mut payload = Vec::new();
    encoder.read_to_end(&mut payload).await?;

    let mut chunk = BytesMut::with_capacity(4 + payload.len());
    chunk.put_u32(payload.len() as u32);
    chunk.put_slice(&payload);
    Ok(chunk.freeze())
}

/// The given snapshot, then every change as it is published.
/// A subscriber that falls behind skips the updates it missed.
pub fn panel_updates(
    snapshot: Vec<PanelState>,
    updates: broadcast::Receiver<PanelState>,
) -> impl Stream<Item = RenderedPanel> + Send + 'static {
    let mut updates = BroadcastStream::new(updates);

    async_stream::stream! {
        for state in snapshot {
            yield render(&state);
        }
        while let Some(update) = updates.next().await {
            match update {
                Ok(state) => yield render(&state),
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    tracing::debug!("Live stream lagged, skipped {} updates", skipped);
                }
            }
        }
    }
}

/// Helper to create a streaming response from the store, ending when the
/// dashboard shuts down
pub fn stream_from_store(
    store: &PanelStore,
    mut shutdown: watch::Receiver<bool>,
    compress: bool,
) -> Response<Body> {
    // Subscribe first: a change racing the snapshot is sent twice, never lost
    let updates = store.subscribe();
    let snapshot = store.snapshot_all();
    let stopped = async move {
        let _ = shutdown.wait_for(|stopped| *stopped).await;
    };

    chunked_json_stream(panel_updates(snapshot, updates).take_until(stopped), compress)
        .unwrap_or_else(|status| status.into_response())
}
