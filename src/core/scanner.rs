use log::trace;

use crate::error::TableError;

/// How invalid UTF-8 sequences in a physical line are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Utf8Policy {
    /// Replace every invalid sequence with U+FFFD.
    #[default]
    Lossy,
    /// Fail with [`TableError::Decode`].
    Strict,
}

/// Cursor over an owned byte buffer that yields one physical line per call.
///
/// `\n` and `\r` each terminate a line on their own: a `\r\n` pair yields an
/// empty line between the two bytes on the following call.
///
/// # Examples
///
/// ```
/// use csv_table::core::scanner::ByteLineScanner;
///
/// let mut scanner = ByteLineScanner::new(b"first\nsecond".to_vec());
///
/// assert_eq!(scanner.next_line(true).unwrap().as_deref(), Some("first"));
/// assert_eq!(scanner.next_line(true).unwrap().as_deref(), Some("second"));
/// assert!(!scanner.can_read());
/// assert_eq!(scanner.next_line(true).unwrap(), None);
/// ```
#[derive(Debug)]
pub struct ByteLineScanner {
    buffer: Vec<u8>,
    offset: usize,
    policy: Utf8Policy,
}

impl ByteLineScanner {
    pub fn new(buffer: Vec<u8>) -> Self {
        Self::with_policy(buffer, Utf8Policy::default())
    }

    pub fn with_policy(buffer: Vec<u8>, policy: Utf8Policy) -> Self {
        Self {
            buffer,
            offset: 0,
            policy,
        }
    }

    /// Whether any byte is left to read.
    pub fn can_read(&self) -> bool {
        self.offset < self.buffer.len()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Reads the next physical line.
    ///
    /// When `skip_control_chars` is set, every byte below 32 in front of the
    /// cursor is skipped first, which drops blank lines and stray
    /// terminators between records.
    ///
    /// Returns `Ok(None)` once the buffer is exhausted.
    pub fn next_line(&mut self, skip_control_chars: bool) -> Result<Option<String>, TableError> {
        let max = self.buffer.len();

        if skip_control_chars {
            while self.offset < max && self.buffer[self.offset] < 32 {
                self.offset += 1;
            }
        }

        if self.offset >= max {
            self.offset = max;
            return Ok(None);
        }

        let start = self.offset;
        let end = self.buffer[start..]
            .iter()
            .position(|&byte| byte == b'\n' || byte == b'\r')
            .map_or(max, |pos| start + pos);

        // One past the terminator, or one past the end when there is none.
        self.offset = end + 1;

        trace!("Physical line [{}, {})", start, end);

        self.decode(start, end).map(Some)
    }

    fn decode(&self, start: usize, end: usize) -> Result<String, TableError> {
        let bytes = &self.buffer[start..end];
        match self.policy {
            Utf8Policy::Lossy => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Utf8Policy::Strict => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|source| TableError::Decode {
                    offset: start,
                    source,
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ByteLineScanner, Utf8Policy};
    use crate::error::TableError;

    fn lines(input: &[u8], skip: bool) -> Vec<String> {
        let mut scanner = ByteLineScanner::new(input.to_vec());
        let mut lines = Vec::new();
        while let Some(line) = scanner.next_line(skip).unwrap() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn empty_buffer_is_not_readable() {
        let mut scanner = ByteLineScanner::new(Vec::new());
        assert!(!scanner.can_read());
        assert_eq!(scanner.next_line(true).unwrap(), None);
        assert_eq!(scanner.next_line(false).unwrap(), None);
        assert_eq!(scanner.offset(), 0);
    }

    #[test]
    fn last_line_without_terminator_closes_the_stream() {
        let mut scanner = ByteLineScanner::new(b"ab".to_vec());
        assert_eq!(scanner.next_line(false).unwrap().as_deref(), Some("ab"));
        assert_eq!(scanner.offset(), 3);
        assert!(!scanner.can_read());
        assert_eq!(scanner.next_line(false).unwrap(), None);
        assert_eq!(scanner.offset(), 2);
    }

    #[test]
    fn carriage_return_and_line_feed_terminate_independently() {
        assert_eq!(lines(b"a\r\nb", false), vec!["a", "", "b"]);
        assert_eq!(lines(b"a\rb\nc", false), vec!["a", "b", "c"]);
    }

    #[test]
    fn control_chars_are_skipped_only_when_asked() {
        assert_eq!(lines(b"a\r\n\n\tb\n", true), vec!["a", "b"]);
        assert_eq!(lines(b"a\n\nb", false), vec!["a", "", "b"]);
    }

    #[test]
    fn trailing_terminator_does_not_yield_an_extra_line() {
        assert_eq!(lines(b"a\n", false), vec!["a"]);
    }

    #[test]
    fn multi_byte_text_is_decoded() {
        assert_eq!(lines("héllo\nwörld".as_bytes(), true), vec!["héllo", "wörld"]);
    }

    #[test]
    fn lossy_policy_replaces_invalid_sequences() {
        assert_eq!(lines(b"a\xffb", true), vec!["a\u{FFFD}b"]);
    }

    #[test]
    fn strict_policy_reports_the_line_offset() {
        let mut scanner = ByteLineScanner::with_policy(b"ok\nb\xff".to_vec(), Utf8Policy::Strict);
        assert_eq!(scanner.next_line(true).unwrap().as_deref(), Some("ok"));
        match scanner.next_line(true) {
            Err(TableError::Decode { offset, .. }) => assert_eq!(offset, 3),
            other => panic!("expected a decode error, got {:?}", other),
        }
    }
}
