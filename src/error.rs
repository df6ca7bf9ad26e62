use thiserror::Error;

#[derive(Error, Debug)]
/// Table error
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8 in line starting at byte {offset}: {source}")]
    Decode {
        offset: usize,
        source: std::str::Utf8Error,
    },

    #[error("column {column} of row '{row_key}' is beyond the header width {width}")]
    ColumnOutOfRange {
        row_key: String,
        column: usize,
        width: usize,
    },

    #[error("duplicate row key '{row_key}' in column '{column}'")]
    DuplicateKey { column: String, row_key: String },

    #[error("Step: {0}")]
    Step(String),

    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),
}
