//! Hex-dump rendering for diagnostic output.
//!
//! Rows hold 16 bytes and look like:
//!
//! ```text
//! 0001  |  31 2E 38 20  0A
//! ```
//!
//! The row label is the 1-based row number, bytes are uppercase hex pairs
//! each followed by a space, and every fourth byte gets one extra space so
//! the row reads as 4-byte words. Every row ends with [`LINE_SEPARATOR`].

use std::fmt::Write as _;

/// Platform line separator appended after every row.
pub const LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

/// Bytes rendered per row.
pub const ROW_WIDTH: usize = 16;

const WORD_WIDTH: usize = 4;
const ROW_SEPARATOR: &str = "  |  ";

/// Render `bytes` as a hex dump.
///
/// Empty input yields just [`LINE_SEPARATOR`].
///
/// ```
/// use propcheck_rules::hexdump::{LINE_SEPARATOR, hex_dump};
///
/// assert_eq!(hex_dump(b"ABC"), format!("0001  |  41 42 43 {LINE_SEPARATOR}"));
/// assert_eq!(hex_dump(&[]), LINE_SEPARATOR);
/// ```
#[must_use]
pub fn hex_dump(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return LINE_SEPARATOR.to_owned();
    }

    let rows = bytes.len().div_ceil(ROW_WIDTH);
    let row_len = 4 + ROW_SEPARATOR.len() + ROW_WIDTH * 3 + ROW_WIDTH / WORD_WIDTH;
    let mut out = String::with_capacity(rows * (row_len + LINE_SEPARATOR.len()));

    for (row_index, row) in bytes.chunks(ROW_WIDTH).enumerate() {
        // fmt::Write for String is infallible.
        let _ = write!(out, "{:04}{ROW_SEPARATOR}", row_index + 1);
        for (column, byte) in row.iter().enumerate() {
            let _ = write!(out, "{byte:02X} ");
            if (column + 1) % WORD_WIDTH == 0 {
                out.push(' ');
            }
        }
        out.push_str(LINE_SEPARATOR);
    }

    out
}

/// A rendered hex dump, usable as the cause of a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct HexDump(String);

impl HexDump {
    /// Dump arbitrary bytes.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        Self(hex_dump(bytes))
    }

    /// Dump the UTF-8 encoding of `value`.
    #[must_use]
    pub fn of_str(value: &str) -> Self {
        Self::of(value.as_bytes())
    }

    /// Borrow the rendered text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of rendered rows (zero for an empty dump).
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.0.lines().filter(|line| !line.is_empty()).count()
    }
}

impl AsRef<str> for HexDump {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<HexDump> for String {
    fn from(dump: HexDump) -> Self {
        dump.0
    }
}
