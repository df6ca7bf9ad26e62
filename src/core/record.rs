use log::debug;

use super::scanner::ByteLineScanner;
use crate::error::TableError;

/// A logical CSV record: the unescaped cells of one row.
pub type Record = Vec<String>;

const LINE_BREAK: &str = "\n";
const ESCAPED_LINE_BREAK: &str = "\\n";

/// Tokenizer state carried across the physical lines of one record.
///
/// `word_start` always points at the first byte of the field being built,
/// so a continuation line only rescans the unresolved quoted field.
#[derive(Debug, Default)]
struct RecordState {
    inside_quotes: bool,
    word_start: usize,
    line: String,
    cells: Record,
}

enum Scan {
    /// A closing quote ended the line; the record is complete.
    Complete,
    /// The end of the accumulated text was reached.
    EndOfLine,
}

/// Assembles logical records from the physical lines of a [`ByteLineScanner`].
///
/// The two-character sequence backslash + `n` is replaced by a real line
/// break in every line read, before tokenizing. Note that this also rewrites
/// cells that legitimately contain that sequence, such as Windows paths.
#[derive(Debug, Clone, Copy)]
pub struct RecordParser {
    field_delimiter: char,
    text_delimiter: char,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new(',', '"')
    }
}

impl RecordParser {
    pub fn new(field_delimiter: char, text_delimiter: char) -> Self {
        Self {
            field_delimiter,
            text_delimiter,
        }
    }

    pub fn field_delimiter(&self) -> char {
        self.field_delimiter
    }

    pub fn text_delimiter(&self) -> char {
        self.text_delimiter
    }

    /// Reads the next logical record.
    ///
    /// Returns `Ok(None)` at the end of the data, including when the data
    /// ends inside a quoted field; the cells of that partial record are
    /// discarded. A record with no cells is a valid result and is used by
    /// callers as an end marker.
    pub fn next_record(&self, scanner: &mut ByteLineScanner) -> Result<Option<Record>, TableError> {
        let mut state = RecordState::default();

        while scanner.can_read() {
            if state.inside_quotes {
                let Some(next) = scanner.next_line(false)? else {
                    debug!("Data ended inside a quoted field");
                    return Ok(None);
                };
                state.line.push_str(LINE_BREAK);
                state.line.push_str(&next.replace(ESCAPED_LINE_BREAK, LINE_BREAK));
            } else {
                let Some(next) = scanner.next_line(true)? else {
                    return Ok(None);
                };
                state.line = next.replace(ESCAPED_LINE_BREAK, LINE_BREAK);
                state.word_start = 0;
            }

            if let Scan::Complete = self.scan(&mut state) {
                return Ok(Some(state.cells));
            }

            if state.word_start < state.line.len() {
                if state.inside_quotes {
                    continue;
                }
                state.cells.push(state.line[state.word_start..].to_owned());
            }

            return Ok(Some(state.cells));
        }

        Ok(None)
    }

    fn scan(&self, state: &mut RecordState) -> Scan {
        let line = &state.line;
        let mut i = state.word_start;

        while let Some(ch) = line[i..].chars().next() {
            let next_index = i + ch.len_utf8();

            if ch == self.field_delimiter {
                if !state.inside_quotes {
                    state.cells.push(line[state.word_start..i].to_owned());
                    state.word_start = next_index;
                }
            } else if ch == self.text_delimiter {
                if state.inside_quotes {
                    match line[next_index..].chars().next() {
                        None => {
                            state.cells.push(self.unescape(&line[state.word_start..i]));
                            return Scan::Complete;
                        }
                        Some(next) if next != self.text_delimiter => {
                            state.cells.push(self.unescape(&line[state.word_start..i]));
                            state.inside_quotes = false;

                            if next == self.field_delimiter {
                                i = next_index;
                                state.word_start = i + next.len_utf8();
                            }
                        }
                        Some(_) => {
                            // Doubled quote: a literal quote inside the field.
                            i = next_index;
                        }
                    }
                } else {
                    state.word_start = next_index;
                    state.inside_quotes = true;
                }
            }

            // `i` may have moved onto the second quote or the delimiter.
            i += line[i..].chars().next().map_or(1, char::len_utf8);
        }

        Scan::EndOfLine
    }

    fn unescape(&self, field: &str) -> String {
        let quote = self.text_delimiter.to_string();
        field.replace(&quote.repeat(2), &quote)
    }
}
