//! C1: the `Content-Length`-framed envelope codec.
//!
//! Mirrors the line-oriented parsers elsewhere in this codebase (see
//! `stream_json::ClaudeStreamJsonParser`) but operates on a growable byte
//! buffer instead of text lines, since DAP frames are binary-length-prefixed
//! rather than newline-delimited.

use serde_json::Value;

use crate::error::FrameError;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";
const CONTENT_LENGTH: &str = "content-length";
const CONTENT_TYPE: &str = "content-type";

/// Incremental decoder for the DAP wire envelope.
///
/// Bytes are appended with [`FrameDecoder::push`]; complete frames are
/// pulled out with [`FrameDecoder::next_frame`]. The decoder never blocks
/// and retains only the bytes of the single in-flight frame plus whatever
/// trailing partial bytes have not yet formed a complete frame.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    /// Create an empty decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append inbound bytes to the decoder's buffer.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Discard all buffered bytes, including any partial frame.
    ///
    /// Called after a decode failure per the failure-isolation contract:
    /// the simplest safe recovery is to clear the buffer and let the next
    /// `push` start clean.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Attempt to extract one complete frame's worth of JSON values.
    ///
    /// Returns `Ok(None)` when the buffer does not yet contain a complete
    /// frame (the caller should wait for more bytes). Returns `Ok(Some(_))`
    /// with one element per message — more than one if the frame's body was
    /// a JSON array (a batch). Returns `Err` on a malformed header or body;
    /// callers are expected to call [`FrameDecoder::clear`] in that case.
    pub fn next_frame(&mut self) -> Result<Option<Vec<Value>>, FrameError> {
        let Some(header_end) = find(&self.buf, HEADER_TERMINATOR) else {
            return Ok(None);
        };

        let header_bytes = &self.buf[..header_end];
        let headers = parse_headers(header_bytes)?;

        let content_length = headers
            .iter()
            .find(|(k, _)| k == CONTENT_LENGTH)
            .map(|(_, v)| v.as_str())
            .ok_or(FrameError::MissingContentLength)?
            .parse::<usize>()
            .map_err(|_| {
                FrameError::InvalidContentLength(
                    headers
                        .iter()
                        .find(|(k, _)| k == CONTENT_LENGTH)
                        .map(|(_, v)| v.clone())
                        .unwrap_or_default(),
                )
            })?;

        let body_start = header_end + HEADER_TERMINATOR.len();
        if self.buf.len() < body_start + content_length {
            return Ok(None);
        }

        let body = self.buf[body_start..body_start + content_length].to_vec();
        self.buf.drain(..body_start + content_length);

        let encoding = headers
            .iter()
            .find(|(k, _)| k == CONTENT_TYPE)
            .map(|(_, v)| charset_of(v))
            .unwrap_or_else(|| "utf-8".to_string());

        if content_length == 0 {
            // A zero-length body carries no JSON to parse; treat it as a
            // single empty-body message rather than a JSON syntax error.
            return Ok(Some(vec![Value::Null]));
        }

        let text = decode_text(&body, &encoding)?;
        let value: Value = serde_json::from_str(&text)?;

        Ok(Some(match value {
            Value::Array(items) => items,
            other => vec![other],
        }))
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

fn parse_headers(header_bytes: &[u8]) -> Result<Vec<(String, String)>, FrameError> {
    let header_text = std::str::from_utf8(header_bytes).map_err(|_| FrameError::InvalidText {
        encoding: "ascii header".to_string(),
    })?;

    let mut headers = Vec::new();
    for line in header_text.split("\r\n") {
        if line.is_empty() {
            continue;
        }
        let Some((name, value)) = line.split_once(": ") else {
            return Err(FrameError::MalformedHeaderLine(line.to_string()));
        };
        headers.push((name.to_ascii_lowercase(), value.to_string()));
    }
    Ok(headers)
}

/// Extract the `charset` parameter from a `Content-Type` header value,
/// defaulting to `utf-8` when absent.
fn charset_of(content_type: &str) -> String {
    content_type
        .split(';')
        .skip(1)
        .find_map(|param| {
            let (key, value) = param.trim().split_once('=')?;
            (key.eq_ignore_ascii_case("charset")).then(|| value.trim().to_string())
        })
        .unwrap_or_else(|| "utf-8".to_string())
}

fn decode_text(bytes: &[u8], encoding: &str) -> Result<String, FrameError> {
    if !encoding.eq_ignore_ascii_case("utf-8") && !encoding.eq_ignore_ascii_case("utf8") {
        return Err(FrameError::UnsupportedEncoding(encoding.to_string()));
    }
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| FrameError::InvalidText {
            encoding: encoding.to_string(),
        })
}

/// Serialize a single JSON body into a framed envelope.
///
/// The encoder deliberately omits `Content-Type` for maximum compatibility
/// with minimal adapters, matching spec.md's `Content-Length`-only contract.
pub fn encode_frame(body: &Value) -> Vec<u8> {
    let json = serde_json::to_string(body).expect("protocol messages always serialize");
    let mut out = Vec::with_capacity(json.len() + 32);
    out.extend_from_slice(format!("Content-Length: {}\r\n\r\n", json.len()).as_bytes());
    out.extend_from_slice(json.as_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(body: &Value) -> Vec<u8> {
        encode_frame(body)
    }

    #[test]
    fn yields_nothing_until_header_terminator_present() {
        let mut dec = FrameDecoder::new();
        dec.push(b"Content-Length: 2\r\n");
        assert!(dec.next_frame().unwrap().is_none());
    }

    #[test]
    fn empty_body_with_zero_length_yields_one_message() {
        let mut dec = FrameDecoder::new();
        dec.push(b"Content-Length: 0\r\n\r\n");
        let values = dec.next_frame().unwrap().unwrap();
        assert_eq!(values, vec![Value::Null]);
    }

    #[test]
    fn content_length_larger_than_buffer_preserves_buffer() {
        let mut dec = FrameDecoder::new();
        let full = frame(&json!({"type": "event", "seq": 1, "event": "x"}));
        dec.push(&full[..full.len() - 3]);
        assert!(dec.next_frame().unwrap().is_none());
        dec.push(&full[full.len() - 3..]);
        assert!(dec.next_frame().unwrap().is_some());
    }

    #[test]
    fn headers_are_case_insensitive() {
        let mut dec = FrameDecoder::new();
        let body = json!({"type": "event", "seq": 1, "event": "x"});
        let json_str = serde_json::to_string(&body).unwrap();
        let raw = format!("CONTENT-LENGTH: {}\r\n\r\n{}", json_str.len(), json_str);
        dec.push(raw.as_bytes());
        let values = dec.next_frame().unwrap().unwrap();
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn batch_array_yields_each_element_in_order() {
        let mut dec = FrameDecoder::new();
        let batch = json!([
            {"type": "event", "seq": 1, "event": "a"},
            {"type": "event", "seq": 2, "event": "b"},
        ]);
        dec.push(&frame(&batch));
        let values = dec.next_frame().unwrap().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["event"], "a");
        assert_eq!(values[1]["event"], "b");
    }

    #[test]
    fn extra_headers_are_tolerated() {
        let mut dec = FrameDecoder::new();
        let body = json!({"type": "event", "seq": 1, "event": "x"});
        let json_str = serde_json::to_string(&body).unwrap();
        let raw = format!(
            "Content-Length: {}\r\nContent-Type: application/vscode-jsonrpc; charset=utf-8\r\n\r\n{}",
            json_str.len(),
            json_str
        );
        dec.push(raw.as_bytes());
        assert!(dec.next_frame().unwrap().is_some());
    }

    #[test]
    fn utf8_body_round_trips_exact_string() {
        let mut dec = FrameDecoder::new();
        let body = json!({"type": "event", "seq": 1, "event": "x", "body": {"text": "h\u{e9}llo \u{1f30d}"}});
        dec.push(&frame(&body));
        let values = dec.next_frame().unwrap().unwrap();
        assert_eq!(values[0]["body"]["text"], "héllo 🌍");
    }

    #[test]
    fn missing_content_length_is_fatal() {
        let mut dec = FrameDecoder::new();
        dec.push(b"X-Other: 1\r\n\r\n{}");
        assert!(matches!(
            dec.next_frame(),
            Err(FrameError::MissingContentLength)
        ));
    }

    #[test]
    fn incremental_feed_matches_single_feed() {
        let batch = json!({"type": "event", "seq": 9, "event": "stopped"});
        let full = frame(&batch);

        let mut one_shot = FrameDecoder::new();
        one_shot.push(&full);
        let one_shot_values = one_shot.next_frame().unwrap().unwrap();

        let mut split = FrameDecoder::new();
        let (a, b) = full.split_at(full.len() / 2);
        split.push(a);
        assert!(split.next_frame().unwrap().is_none());
        split.push(b);
        let split_values = split.next_frame().unwrap().unwrap();

        assert_eq!(one_shot_values, split_values);
    }
}
