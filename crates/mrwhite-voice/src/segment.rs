//! Sentence segmentation for streamed narration.
//!
//! All offsets are byte offsets into the text passed in, always on a `char`
//! boundary, so callers can slice with them directly.

use std::ops::Range;

const TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Find the end of the first complete sentence in `unspoken`.
///
/// A sentence ends at `.`, `!` or `?` immediately followed by whitespace or
/// the end of the text. The boundary is extended over the whitespace run
/// that follows, so `"Hello there. How"` yields 13 (after the space) and the
/// next segment starts cleanly at `"How"`. A terminator followed by anything
/// else (`3.5`, `e.g.x`) is not a boundary.
///
/// Returns `None` while no sentence has completed yet.
pub fn find_speakable_segment(unspoken: &str) -> Option<usize> {
    let mut chars = unspoken.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if !TERMINATORS.contains(&c) {
            continue;
        }

        let mut boundary = idx + c.len_utf8();
        match chars.peek() {
            None => return Some(boundary),
            Some(&(_, next)) if next.is_whitespace() => {
                while let Some(&(ws_idx, ws)) = chars.peek() {
                    if !ws.is_whitespace() {
                        break;
                    }
                    boundary = ws_idx + ws.len_utf8();
                    chars.next();
                }
                return Some(boundary);
            }
            Some(_) => {}
        }
    }

    None
}

/// Find the span to narrate while the response is still streaming.
///
/// Consecutive sentences are accumulated until the span holds at least
/// `min_chars` characters (see [`spoken_len`]), so a short opener like
/// `"Ok."` is held back and spoken together with what follows.
pub fn next_narration_span(unspoken: &str, min_chars: usize) -> Option<usize> {
    let mut end = 0;

    while end < unspoken.len() {
        let offset = find_speakable_segment(&unspoken[end..])?;
        end += offset;
        if spoken_len(&unspoken[..end]) >= min_chars {
            return Some(end);
        }
    }

    None
}

/// Split the final remainder of a response into narration spans.
///
/// Every complete sentence becomes its own span; an unterminated tail is
/// the last span. Whitespace-only tails are dropped. Spans are contiguous
/// from offset 0, so summing their lengths gives the consumed offset.
pub fn flush_spans(remainder: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;

    while start < remainder.len() {
        match find_speakable_segment(&remainder[start..]) {
            Some(offset) => {
                spans.push(start..start + offset);
                start += offset;
            }
            None => {
                if !remainder[start..].trim().is_empty() {
                    spans.push(start..remainder.len());
                }
                break;
            }
        }
    }

    spans
}

/// Length of a span as it would be spoken (characters, ignoring the
/// surrounding whitespace).
pub fn spoken_len(span: &str) -> usize {
    span.trim().chars().count()
}
