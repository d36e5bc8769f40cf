use futures::{Stream, StreamExt};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::RawStatus;
use crate::error::NisError;

static KEY_VALUE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([A-Z]+)[ \t]*:[ \t]*(.*)").expect("status line pattern is valid")
});

/// How much of each status frame is examined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodeMode {
    /// Only the first `KEY : value` line of a frame. apcupsd sends one line
    /// per frame, so this is all a normal report needs.
    #[default]
    FirstLine,
    /// Every `KEY : value` line of a frame.
    AllLines,
}

/// Add the `KEY : value` pair(s) found in one frame payload to `raw`.
///
/// Frames with no matching line are ignored. Returns how many pairs were taken.
pub fn decode_frame(payload: &[u8], mode: DecodeMode, raw: &mut RawStatus) -> usize {
    let text = String::from_utf8_lossy(payload);

    let mut taken = 0;
    for caps in KEY_VALUE_LINE.captures_iter(&text) {
        raw.insert(&caps[1], &caps[2]);
        taken += 1;
        if mode == DecodeMode::FirstLine {
            break;
        }
    }
    taken
}

/// Drain a frame stream into a [`RawStatus`].
///
/// Any transport error aborts the whole decode; no partial status is returned.
pub async fn decode_status<S>(frames: S, mode: DecodeMode) -> Result<RawStatus, NisError>
where
    S: Stream<Item = Result<Vec<u8>, NisError>>,
{
    futures::pin_mut!(frames);

    let mut raw = RawStatus::new();
    while let Some(frame) = frames.next().await {
        let frame = frame?;
        if decode_frame(&frame, mode, &mut raw) == 0 {
            tracing::trace!(len = frame.len(), "skipping frame without a status line");
        }
    }
    Ok(raw)
}
