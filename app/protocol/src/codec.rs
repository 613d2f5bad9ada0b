//! Event-stream framing for streamed invocations.
//!
//! Wire format: `data: <json>\n\n` per frame. The decoder accepts bytes in
//! arbitrary chunks, joins multi-line `data:` fields with `\n`, and skips
//! comment lines (`:`) and fields other than `data`.

use bytes::{Buf, Bytes, BytesMut};
use serde::{Serialize, de::DeserializeOwned};

/// Maximum buffered size of a single frame: 16 MiB.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Content type of an event stream.
pub const EVENT_STREAM: &str = "text/event-stream";

const DELIMITER: &[u8] = b"\n\n";

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug)]
pub enum FrameError {
    /// A frame grew past the maximum size without terminating.
    TooLarge { size: usize },
    /// Frame data is not valid UTF-8.
    Utf8(std::str::Utf8Error),
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooLarge { size } => {
                write!(f, "frame too large: {size} bytes (max {MAX_FRAME_SIZE})")
            }
            Self::Utf8(e) => write!(f, "invalid utf-8 in frame: {e}"),
            Self::Json(e) => write!(f, "json error: {e}"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Utf8(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::TooLarge { .. } => None,
        }
    }
}

impl From<std::str::Utf8Error> for FrameError {
    fn from(e: std::str::Utf8Error) -> Self {
        Self::Utf8(e)
    }
}

impl From<serde_json::Error> for FrameError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Encode a typed message as one `data:` frame.
pub fn encode_frame<T: Serialize>(msg: &T) -> Result<Bytes, FrameError> {
    let json = serde_json::to_vec(msg)?;
    let mut frame = BytesMut::with_capacity(json.len() + 8);
    frame.extend_from_slice(b"data: ");
    frame.extend_from_slice(&json);
    frame.extend_from_slice(DELIMITER);
    Ok(frame.freeze())
}

/// Encode a typed message as a frame carrying an `event:` name.
///
/// Used for the terminal error frame of a failed stream.
pub fn encode_named_frame<T: Serialize>(event: &str, msg: &T) -> Result<Bytes, FrameError> {
    let data = encode_frame(msg)?;
    let mut frame = BytesMut::with_capacity(event.len() + data.len() + 8);
    frame.extend_from_slice(b"event: ");
    frame.extend_from_slice(event.as_bytes());
    frame.extend_from_slice(b"\n");
    frame.extend_from_slice(&data);
    Ok(frame.freeze())
}

/// Incremental decoder for a stream of `data:` frames.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: BytesMut,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append received bytes.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Bytes received but not yet part of a complete frame.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Decode the next complete frame, if one is buffered.
    ///
    /// Frames without a `data` field are skipped. Returns `None` when more
    /// bytes are needed.
    pub fn next_frame<T: DeserializeOwned>(&mut self) -> Option<Result<T, FrameError>> {
        loop {
            let Some(end) = find(&self.buf, DELIMITER) else {
                if self.buf.len() > MAX_FRAME_SIZE {
                    let size = self.buf.len();
                    self.buf.clear();
                    return Some(Err(FrameError::TooLarge { size }));
                }
                return None;
            };

            let raw = self.buf.split_to(end);
            self.buf.advance(DELIMITER.len());
            match data_field(&raw) {
                Ok(Some(data)) => return Some(serde_json::from_str(&data).map_err(Into::into)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }

    /// Feed a chunk and collect every frame it completes.
    pub fn decode<T: DeserializeOwned>(&mut self, chunk: &[u8]) -> Result<Vec<T>, FrameError> {
        self.extend(chunk);
        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame() {
            frames.push(frame?);
        }
        Ok(frames)
    }
}

/// Join the `data` lines of one raw frame.
fn data_field(raw: &[u8]) -> Result<Option<String>, FrameError> {
    let text = std::str::from_utf8(raw)?;
    let mut data: Option<String> = None;
    for line in text.lines() {
        let Some(value) = line.strip_prefix("data:") else {
            continue;
        };
        let value = value.strip_prefix(' ').unwrap_or(value);
        match data.as_mut() {
            Some(acc) => {
                acc.push('\n');
                acc.push_str(value);
            }
            None => data = Some(value.to_owned()),
        }
    }
    Ok(data)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
