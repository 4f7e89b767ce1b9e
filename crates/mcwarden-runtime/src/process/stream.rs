//! Console stream readers (non-UTF8-safe).
//!
//! The JVM and its plugins occasionally print bytes that are not valid
//! UTF-8 (legacy colour codes, platform encodings). `BufReader::lines()`
//! would end the reader on the first such byte, so lines are split on
//! `\n` and decoded lossily instead.
//!
//! A line longer than [`MAX_LINE_BYTES`] is forwarded in pieces so a child
//! that never prints a newline cannot grow the buffer without bound.

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::types::WorkerMessage;

/// Longest chunk forwarded as a single `Output` line.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Forward every line of `stream` to the worker channel until EOF.
///
/// The returned handle finishes once the stream is closed, which lets the
/// exit path wait for buffered output before reporting the exit.
pub fn spawn_line_reader(
    stream: impl AsyncRead + Unpin + Send + 'static,
    stream_type: &'static str,
    lines: mpsc::Sender<WorkerMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf: Vec<u8> = Vec::with_capacity(1024);
        let mut split = false;

        loop {
            buf.clear();
            let mut limited = (&mut reader).take(MAX_LINE_BYTES as u64);
            match limited.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    // The newline closing a line that was cut exactly at the cap.
                    let tail_only = split && trim_line_ending(&buf).is_empty();
                    split = !buf.ends_with(b"\n");
                    if tail_only {
                        continue;
                    }
                    let line = String::from_utf8_lossy(trim_line_ending(&buf)).into_owned();
                    if lines.send(WorkerMessage::Output(line)).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    debug!(%stream_type, error = %e, "console reader exiting due to read error");
                    break;
                }
            }
        }

        debug!(%stream_type, "console reader task exiting");
    })
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
