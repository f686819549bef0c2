//! Newline-delimited reading with a hard cap on line length.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, BufReader};

/// One decoded input line.
pub struct RawLine {
    /// Lossily decoded, whitespace-trimmed text from at most `max_len` raw
    /// bytes of the wire line.
    pub text: String,
    /// True when the wire line exceeded the cap and was cut short.
    pub truncated: bool,
}

/// Reads `\n`-terminated lines, keeping only the first `max_len` bytes of
/// each. Overflow up to the newline is consumed and discarded so the stream
/// stays in sync.
pub struct LineReader<R> {
    inner: BufReader<R>,
    max_len: usize,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(inner: R, max_len: usize) -> Self {
        Self {
            inner: BufReader::new(inner),
            max_len,
        }
    }

    /// Next capped line, or `None` on a clean end of stream. A final
    /// unterminated line is still delivered.
    pub async fn next_line(&mut self) -> io::Result<Option<RawLine>> {
        let mut buf: Vec<u8> = Vec::new();
        let mut truncated = false;
        let mut saw_any = false;

        loop {
            let byte = match self.inner.read_u8().await {
                Ok(b) => b,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    if !saw_any {
                        return Ok(None);
                    }
                    break;
                }
                Err(e) => return Err(e),
            };
            saw_any = true;
            if byte == b'\n' {
                break;
            }
            if buf.len() < self.max_len {
                buf.push(byte);
            } else {
                truncated = true;
            }
        }

        let text = String::from_utf8_lossy(&buf).trim().to_string();
        Ok(Some(RawLine { text, truncated }))
    }
}
