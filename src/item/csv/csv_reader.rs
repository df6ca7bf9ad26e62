use std::{cell::RefCell, fs, io::Read, path::Path};

use log::{debug, info};

use crate::{
    core::{
        item::{ItemReader, ItemReaderResult},
        record::{Record, RecordParser},
        scanner::{ByteLineScanner, Utf8Policy},
        step::StepBuilder,
        table::{DuplicatePolicy, Table, TableAssembler},
    },
    error::TableError,
};

/// A CSV reader over an in-memory byte buffer.
///
/// The whole input is held once; records are tokenized on demand, one
/// logical record per call, without splitting the buffer into lines up
/// front.
///
/// # Implementation Details
///
/// - Uses a `RefCell` around the scanner so reading works through `&self`,
///   as the `ItemReader` trait requires
/// - Cells are raw strings: no trimming, no type conversion
/// - As an `ItemReader`, an empty record ends the data
///
/// # Examples
///
/// ```
/// use csv_table::item::csv::csv_reader::CsvRecordReaderBuilder;
///
/// let reader = CsvRecordReaderBuilder::new().from_bytes("a,\"b,c\"\n1,2".as_bytes());
///
/// assert_eq!(reader.read_record().unwrap(), Some(vec!["a".to_string(), "b,c".to_string()]));
/// assert_eq!(reader.read_record().unwrap(), Some(vec!["1".to_string(), "2".to_string()]));
/// assert_eq!(reader.read_record().unwrap(), None);
/// ```
#[derive(Debug)]
pub struct CsvRecordReader {
    scanner: RefCell<ByteLineScanner>,
    parser: RecordParser,
    policy: DuplicatePolicy,
}

impl CsvRecordReader {
    /// Whether unread bytes remain.
    pub fn can_read(&self) -> bool {
        self.scanner.borrow().can_read()
    }

    /// Reads a single physical line, see [`ByteLineScanner::next_line`].
    pub fn read_line(&self, skip_control_chars: bool) -> Result<Option<String>, TableError> {
        self.scanner.borrow_mut().next_line(skip_control_chars)
    }

    /// Reads the next logical record.
    ///
    /// Unlike [`ItemReader::read`], a record without cells is returned as
    /// `Some(vec![])`.
    pub fn read_record(&self) -> Result<Option<Record>, TableError> {
        self.parser.next_record(&mut self.scanner.borrow_mut())
    }

    /// Reads every remaining record into a [`Table`].
    ///
    /// The first record read is the header. Reading stops at the end of the
    /// data or at the first empty record. An empty input gives an empty
    /// table.
    ///
    /// # Examples
    ///
    /// ```
    /// use csv_table::item::csv::csv_reader::CsvRecordReaderBuilder;
    ///
    /// let reader = CsvRecordReaderBuilder::new().from_bytes("a,b\n1,2\n3,4".as_bytes());
    /// let table = reader.read_table().unwrap();
    ///
    /// assert_eq!(table.len(), 1);
    /// assert_eq!(table.get("b", "1"), Some("2"));
    /// assert_eq!(table.get("b", "3"), Some("4"));
    /// ```
    pub fn read_table(&self) -> Result<Table, TableError> {
        let assembler = TableAssembler::with_policy(self.policy);

        let step = StepBuilder::new("read_table")
            .reader(self)
            .writer(&assembler)
            .chunk(64)
            .build()?;
        let execution = step.execute()?;

        let table = assembler.into_table();
        info!(
            "Table with {} columns built from {} records in {:?}",
            table.len(),
            execution.read_count,
            execution.duration
        );
        Ok(table)
    }
}

impl ItemReader<Record> for CsvRecordReader {
    /// Reads the next non-empty record.
    ///
    /// # Returns
    /// - `Ok(Some(record))` if a record with at least one cell is read
    /// - `Ok(None)` at the end of the data or on an empty record
    /// - `Err(TableError)` if a line cannot be decoded
    fn read(&self) -> ItemReaderResult<Record> {
        match self.read_record()? {
            Some(record) if !record.is_empty() => Ok(Some(record)),
            Some(_) => {
                debug!("Empty record ends the data");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

/// A builder for configuring CSV record reading.
///
/// # Default Configuration
///
/// - Field delimiter: comma (,)
/// - Text delimiter: double quote (")
/// - Invalid UTF-8: replaced with U+FFFD
/// - Duplicate row keys in `read_table`: rejected
///
/// # Examples
///
/// ```
/// use csv_table::core::scanner::Utf8Policy;
/// use csv_table::item::csv::csv_reader::CsvRecordReaderBuilder;
///
/// let reader = CsvRecordReaderBuilder::new()
///     .field_delimiter(';')
///     .text_delimiter('\'')
///     .utf8_policy(Utf8Policy::Strict)
///     .from_bytes("key;'a;b'".as_bytes());
///
/// assert_eq!(reader.read_record().unwrap(), Some(vec!["key".to_string(), "a;b".to_string()]));
/// ```
#[derive(Debug, Clone)]
pub struct CsvRecordReaderBuilder {
    field_delimiter: char,
    text_delimiter: char,
    utf8_policy: Utf8Policy,
    duplicate_policy: DuplicatePolicy,
}

impl Default for CsvRecordReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvRecordReaderBuilder {
    pub fn new() -> Self {
        Self {
            field_delimiter: ',',
            text_delimiter: '"',
            utf8_policy: Utf8Policy::Lossy,
            duplicate_policy: DuplicatePolicy::Reject,
        }
    }

    pub fn field_delimiter(mut self, delimiter: char) -> Self {
        self.field_delimiter = delimiter;
        self
    }

    pub fn text_delimiter(mut self, delimiter: char) -> Self {
        self.text_delimiter = delimiter;
        self
    }

    pub fn utf8_policy(mut self, policy: Utf8Policy) -> Self {
        self.utf8_policy = policy;
        self
    }

    /// How `read_table` handles a row key seen twice in one column.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Creates a reader owning `bytes`.
    pub fn from_bytes(self, bytes: impl Into<Vec<u8>>) -> CsvRecordReader {
        CsvRecordReader {
            scanner: RefCell::new(ByteLineScanner::with_policy(bytes.into(), self.utf8_policy)),
            parser: RecordParser::new(self.field_delimiter, self.text_delimiter),
            policy: self.duplicate_policy,
        }
    }

    /// Creates a reader over the whole content of `rdr`.
    pub fn from_reader<R: Read>(self, mut rdr: R) -> Result<CsvRecordReader, TableError> {
        let mut bytes = Vec::new();
        rdr.read_to_end(&mut bytes)?;
        Ok(self.from_bytes(bytes))
    }

    /// Creates a reader over the content of the file at `path`.
    ///
    /// # Errors
    /// Returns `TableError::Io` if the file cannot be read.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvRecordReader, TableError> {
        let bytes = fs::read(path.as_ref())?;
        debug!("Loaded {} bytes from {}", bytes.len(), path.as_ref().display());
        Ok(self.from_bytes(bytes))
    }
}
