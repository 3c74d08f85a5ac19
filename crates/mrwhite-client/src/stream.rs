//! Chat stream decoding.
//!
//! Turns the chunked HTTP body of the chat stream endpoint into a stream of
//! [`StreamChunk`]s. Accepts Server-Sent Events (`data: {...}` lines) and
//! newline-delimited JSON interchangeably, one chunk per line.

use bytes::{Bytes, BytesMut};
use futures_util::stream::BoxStream;
use futures_util::{Stream, StreamExt};
use mrwhite_core::{ApiError, ChunkStream, StreamChunk};

const KNOWN_TYPES: [&str; 4] = ["token", "metadata", "done", "error"];

/// Decode a chunked response body into stream chunks.
///
/// The returned stream ends after `data: [DONE]`, after the first transport
/// or decode error, or when the body ends. A final line without a trailing
/// newline is still decoded.
pub fn decode_chunks<S, E>(body: S) -> ChunkStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + 'static,
{
    let state = DecodeState {
        body: body.map(|r| r.map_err(|e| e.to_string())).boxed(),
        buf: BytesMut::new(),
        eof: false,
        done: false,
    };

    futures_util::stream::unfold(state, |mut st| async move {
        if st.done {
            return None;
        }

        loop {
            if let Some(line) = st.next_line() {
                match parse_line(&line) {
                    Line::Skip => continue,
                    Line::End => {
                        st.done = true;
                        return None;
                    }
                    Line::Chunk(chunk) => return Some((Ok(chunk), st)),
                    Line::Invalid(e) => {
                        st.done = true;
                        return Some((Err(e), st));
                    }
                }
            }

            if st.eof {
                return None;
            }

            match st.body.next().await {
                Some(Ok(bytes)) => st.buf.extend_from_slice(&bytes),
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Chat stream interrupted");
                    st.done = true;
                    return Some((Err(ApiError::Transport(e)), st));
                }
                None => {
                    st.eof = true;
                    if !st.buf.is_empty() {
                        st.buf.extend_from_slice(b"\n");
                    }
                }
            }
        }
    })
    .boxed()
}

/// State threaded through the `unfold` stream.
struct DecodeState {
    body: BoxStream<'static, Result<Bytes, String>>,
    buf: BytesMut,
    eof: bool,
    done: bool,
}

impl DecodeState {
    /// Take one complete line off the buffer, if there is one.
    fn next_line(&mut self) -> Option<String> {
        let end = self.buf.iter().position(|&b| b == b'\n')?;
        let line = self.buf.split_to(end + 1);
        Some(String::from_utf8_lossy(&line).into_owned())
    }
}

#[derive(Debug)]
enum Line {
    Skip,
    End,
    Chunk(StreamChunk),
    Invalid(ApiError),
}

fn parse_line(raw: &str) -> Line {
    let line = raw.trim();

    // Blank lines separate SSE events; `:` starts an SSE comment.
    if line.is_empty() || line.starts_with(':') {
        return Line::Skip;
    }

    let payload = if let Some(data) = line.strip_prefix("data:") {
        data.trim()
    } else if ["event:", "id:", "retry:"].iter().any(|f| line.starts_with(f)) {
        return Line::Skip;
    } else {
        line
    };

    if payload == "[DONE]" {
        return Line::End;
    }
    if payload.is_empty() {
        return Line::Skip;
    }

    match serde_json::from_str::<StreamChunk>(payload) {
        Ok(chunk) => Line::Chunk(chunk),
        Err(e) => {
            let kind = serde_json::from_str::<serde_json::Value>(payload)
                .ok()
                .and_then(|v| v.get("type").and_then(|t| t.as_str()).map(str::to_string));
            match kind {
                Some(kind) if !KNOWN_TYPES.contains(&kind.as_str()) => {
                    tracing::debug!(kind, "Skipping unknown stream chunk type");
                    Line::Skip
                }
                _ => Line::Invalid(ApiError::Decode(format!("{e} in stream line {payload:?}"))),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    fn body(parts: &[&str]) -> stream::Iter<std::vec::IntoIter<Result<Bytes, std::io::Error>>> {
        let parts: Vec<Result<Bytes, std::io::Error>> = parts
            .iter()
            .map(|p| Ok(Bytes::from(p.to_string())))
            .collect();
        stream::iter(parts)
    }

    async fn collect(parts: &[&str]) -> Vec<Result<StreamChunk, ApiError>> {
        decode_chunks(body(parts)).collect().await
    }

    fn token(content: &str) -> StreamChunk {
        StreamChunk::Token {
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn decodes_sse_events() {
        let chunks = collect(&[
            "data: {\"type\":\"token\",\"content\":\"Hi\"}\n\n",
            "data: {\"type\":\"done\"}\n\n",
        ])
        .await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], Ok(token("Hi")));
        assert_eq!(chunks[1], Ok(StreamChunk::Done { metadata: None }));
    }

    #[tokio::test]
    async fn decodes_ndjson_lines() {
        let chunks = collect(&[
            "{\"type\":\"token\",\"content\":\"a\"}\n{\"type\":\"token\",\"content\":\"b\"}\n",
        ])
        .await;
        assert_eq!(chunks, vec![Ok(token("a")), Ok(token("b"))]);
    }

    #[tokio::test]
    async fn reassembles_lines_split_across_network_chunks() {
        let chunks = collect(&[
            "data: {\"type\":\"tok",
            "en\",\"content\":\"Wo",
            "of\"}\n",
        ])
        .await;
        assert_eq!(chunks, vec![Ok(token("Woof"))]);
    }

    #[tokio::test]
    async fn multibyte_split_is_reassembled() {
        let line = "data: {\"type\":\"token\",\"content\":\"Très\"}\n";
        let split = line.find('è').unwrap() + 1;
        let bytes = line.as_bytes();
        let parts: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::copy_from_slice(&bytes[..split])),
            Ok(Bytes::copy_from_slice(&bytes[split..])),
        ];
        let chunks: Vec<_> = decode_chunks(stream::iter(parts)).collect().await;
        assert_eq!(chunks, vec![Ok(token("Très"))]);
    }

    #[tokio::test]
    async fn final_line_without_newline() {
        let chunks = collect(&["{\"type\":\"done\",\"metadata\":{\"conversation_id\":4}}"]).await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].as_ref().unwrap().conversation_id(), Some(4));
    }

    #[tokio::test]
    async fn skips_comments_and_sse_fields() {
        let chunks = collect(&[
            ": keep-alive\n",
            "event: message\n",
            "id: 7\n",
            "retry: 1000\n",
            "data: {\"type\":\"token\",\"content\":\"x\"}\n",
        ])
        .await;
        assert_eq!(chunks, vec![Ok(token("x"))]);
    }

    #[tokio::test]
    async fn done_sentinel_ends_stream() {
        let chunks = collect(&[
            "data: {\"type\":\"token\",\"content\":\"x\"}\n",
            "data: [DONE]\n",
            "data: {\"type\":\"token\",\"content\":\"ignored\"}\n",
        ])
        .await;
        assert_eq!(chunks, vec![Ok(token("x"))]);
    }

    #[tokio::test]
    async fn unknown_chunk_types_are_skipped() {
        let chunks = collect(&[
            "data: {\"type\":\"heartbeat\"}\n",
            "data: {\"type\":\"token\",\"content\":\"x\"}\n",
        ])
        .await;
        assert_eq!(chunks, vec![Ok(token("x"))]);
    }

    #[tokio::test]
    async fn malformed_json_is_a_decode_error_and_ends_stream() {
        let chunks = collect(&[
            "data: {not json\n",
            "data: {\"type\":\"token\",\"content\":\"x\"}\n",
        ])
        .await;
        assert_eq!(chunks.len(), 1);
        assert!(matches!(chunks[0], Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn transport_error_ends_stream() {
        let parts: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from_static(b"data: {\"type\":\"token\",\"content\":\"x\"}\n")),
            Err(std::io::Error::other("connection reset")),
            Ok(Bytes::from_static(b"data: {\"type\":\"token\",\"content\":\"y\"}\n")),
        ];
        let chunks: Vec<_> = decode_chunks(stream::iter(parts)).collect().await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], Ok(token("x")));
        assert!(matches!(&chunks[1], Err(ApiError::Transport(msg)) if msg.contains("reset")));
    }
}
