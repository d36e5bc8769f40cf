use std::{future::Future, io, time::Duration};

use futures::Stream;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::NisError;

/// Encode `command` as a single request frame.
pub fn encode_frame(command: &str) -> Result<Vec<u8>, NisError> {
    let len = u16::try_from(command.len()).map_err(|_| {
        NisError::Protocol(format!(
            "command of {} bytes does not fit in a frame",
            command.len()
        ))
    })?;

    let mut out = Vec::with_capacity(2 + command.len());
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(command.as_bytes());
    Ok(out)
}

pub async fn write_command<W>(writer: &mut W, command: &str) -> Result<(), NisError>
where
    W: AsyncWrite + Unpin,
{
    let frame = encode_frame(command)?;
    writer
        .write_all(&frame)
        .await
        .map_err(|e| NisError::Connection(format!("failed writing '{command}' command: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| NisError::Connection(format!("failed flushing '{command}' command: {e}")))
}

/// Read response frames until the zero-length terminator.
///
/// Each yielded item is one frame payload, in the order the daemon sent them.
/// The stream ends after the terminator, or after the first error. With
/// `read_timeout` set, every individual read must finish within it.
pub fn response_frames<R>(
    mut reader: R,
    read_timeout: Option<Duration>,
) -> impl Stream<Item = Result<Vec<u8>, NisError>>
where
    R: AsyncRead + Unpin,
{
    async_stream::try_stream! {
        loop {
            let len = bounded(read_timeout, "frame length", reader.read_u16()).await?;
            if len == 0 {
                break;
            }

            let mut payload = vec![0u8; usize::from(len)];
            bounded(read_timeout, "frame payload", reader.read_exact(&mut payload)).await?;
            yield payload;
        }
    }
}

async fn bounded<T, F>(limit: Option<Duration>, what: &str, read: F) -> Result<T, NisError>
where
    F: Future<Output = io::Result<T>>,
{
    let res = match limit {
        Some(limit) => tokio::time::timeout(limit, read).await.map_err(|_| {
            NisError::Connection(format!("timed out after {limit:?} waiting for {what}"))
        })?,
        None => read.await,
    };
    res.map_err(|e| NisError::from_io(what, e))
}
