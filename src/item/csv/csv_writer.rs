use std::{
    cell::RefCell,
    collections::BTreeSet,
    fs::File,
    io::{self, Write},
    path::Path,
    result,
};

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use log::debug;

use crate::{
    core::{
        item::{ItemWriter, ItemWriterResult},
        table::Table,
    },
    error::TableError,
};

/// Writes tables back in the header-row layout read by
/// [`CsvRecordReader::read_table`](crate::item::csv::csv_reader::CsvRecordReader::read_table).
///
/// The first row holds the key header followed by the outer keys; then one
/// row per row key found in any column. Each row ends after its last present
/// cell, so trailing gaps read back as absent entries. A gap in the middle of
/// a row has to be written as an empty field and reads back as `""`.
/// Every field is quoted so that empty cells survive a read back.
///
/// Cells containing backslash + `n` or `\r` do not survive a read back: the
/// reader turns the former into a line break and treats `\r` as a line
/// terminator.
pub struct CsvTableWriter<T: Write> {
    wrapper: RefCell<Writer<T>>,
    key_header: String,
}

impl<T: Write> CsvTableWriter<T> {
    fn write_table(&self, table: &Table) -> Result<(), TableError> {
        let mut wtr = self.wrapper.borrow_mut();

        let columns: Vec<&str> = table.outer_keys().collect();
        let header = std::iter::once(self.key_header.as_str()).chain(columns.iter().copied());
        wtr.write_record(header)
            .map_err(|error| TableError::ItemWriter(error.to_string()))?;

        let row_keys: BTreeSet<&str> = columns
            .iter()
            .filter_map(|column| table.column(column))
            .flat_map(|rows| rows.keys().map(String::as_str))
            .collect();

        for row_key in &row_keys {
            let width = columns
                .iter()
                .rposition(|column| table.get(column, row_key).is_some())
                .map_or(0, |last| last + 1);
            let cells = columns[..width]
                .iter()
                .map(|column| table.get(column, row_key).unwrap_or_default());
            wtr.write_record(std::iter::once(*row_key).chain(cells))
                .map_err(|error| TableError::ItemWriter(error.to_string()))?;
        }

        debug!("Wrote {} columns and {} rows", columns.len(), row_keys.len());
        Ok(())
    }

    pub fn into_inner(self) -> result::Result<T, TableError> {
        self.wrapper
            .into_inner()
            .into_inner()
            .map_err(|error| TableError::ItemWriter(error.to_string()))
    }
}

impl<T: Write> ItemWriter<Table> for CsvTableWriter<T> {
    fn write(&self, items: &[Table]) -> ItemWriterResult {
        items.iter().try_for_each(|table| self.write_table(table))
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    fn flush(&self) -> ItemWriterResult {
        self.wrapper
            .borrow_mut()
            .flush()
            .map_err(|error| TableError::ItemWriter(error.to_string()))
    }
}

pub struct CsvTableWriterBuilder {
    field_delimiter: u8,
    text_delimiter: u8,
    key_header: String,
}

impl Default for CsvTableWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvTableWriterBuilder {
    pub fn new() -> CsvTableWriterBuilder {
        CsvTableWriterBuilder {
            field_delimiter: b',',
            text_delimiter: b'"',
            key_header: "key".to_owned(),
        }
    }

    pub fn field_delimiter(mut self, delimiter: u8) -> CsvTableWriterBuilder {
        self.field_delimiter = delimiter;
        self
    }

    pub fn text_delimiter(mut self, delimiter: u8) -> CsvTableWriterBuilder {
        self.text_delimiter = delimiter;
        self
    }

    /// Name written in the first cell of the header row.
    pub fn key_header(mut self, key_header: &str) -> CsvTableWriterBuilder {
        self.key_header = key_header.to_owned();
        self
    }

    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<CsvTableWriter<File>, TableError> {
        let file = File::create(path)?;
        Ok(self.from_writer(file))
    }

    /// # Example
    ///
    /// ```
    /// # use std::error::Error;
    /// # use csv_table::{core::item::ItemWriter, item::csv::csv_reader::CsvRecordReaderBuilder};
    /// use csv_table::item::csv::csv_writer::CsvTableWriterBuilder;
    ///
    /// # fn main() { example().unwrap(); }
    /// fn example() -> Result<(), Box<dyn Error>> {
    ///     let table = CsvRecordReaderBuilder::new()
    ///         .from_bytes("key,en,fr\nyes,Yes,Oui".as_bytes())
    ///         .read_table()?;
    ///
    ///     let wtr = CsvTableWriterBuilder::new().from_writer(vec![]);
    ///     wtr.write(&[table])?;
    ///
    ///     let data = String::from_utf8(wtr.into_inner()?)?;
    ///     assert_eq!(data, "\"key\",\"en\",\"fr\"\n\"yes\",\"Yes\",\"Oui\"\n");
    ///     Ok(())
    /// }
    /// ```
    pub fn from_writer<W: io::Write>(self, wtr: W) -> CsvTableWriter<W> {
        let wtr = WriterBuilder::new()
            .flexible(true)
            .has_headers(false)
            .delimiter(self.field_delimiter)
            .quote(self.text_delimiter)
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(wtr);

        CsvTableWriter {
            wrapper: RefCell::new(wtr),
            key_header: self.key_header,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::{
        core::item::ItemWriter,
        item::csv::{csv_reader::CsvRecordReaderBuilder, csv_writer::CsvTableWriterBuilder},
    };

    #[test]
    fn middle_gaps_are_written_empty() -> Result<(), Box<dyn Error>> {
        let table = CsvRecordReaderBuilder::new()
            .from_bytes("id,en,de\na,A\nb,B,Be".as_bytes())
            .read_table()?;

        let wtr = CsvTableWriterBuilder::new()
            .key_header("id")
            .from_writer(vec![]);
        wtr.write(&[table])?;
        wtr.flush()?;

        let data = String::from_utf8(wtr.into_inner()?)?;
        assert_eq!(
            data,
            "\"id\",\"de\",\"en\"\n\"a\",\"\",\"A\"\n\"b\",\"Be\",\"B\"\n"
        );
        Ok(())
    }

    #[test]
    fn rows_end_after_their_last_cell() -> Result<(), Box<dyn Error>> {
        let table = CsvRecordReaderBuilder::new()
            .from_bytes("id,de,en\na,A\nb,Be,B".as_bytes())
            .read_table()?;

        let wtr = CsvTableWriterBuilder::new()
            .key_header("id")
            .from_writer(vec![]);
        wtr.write(&[table])?;

        let data = String::from_utf8(wtr.into_inner()?)?;
        assert_eq!(
            data,
            "\"id\",\"de\",\"en\"\n\"a\",\"A\"\n\"b\",\"Be\",\"B\"\n"
        );
        Ok(())
    }

    #[test]
    fn custom_delimiters_read_back() -> Result<(), Box<dyn Error>> {
        let table = CsvRecordReaderBuilder::new()
            .from_bytes("key,en\ngreet,\"Hi; \"\"you\"\"\"".as_bytes())
            .read_table()?;

        let wtr = CsvTableWriterBuilder::new()
            .field_delimiter(b';')
            .text_delimiter(b'\'')
            .from_writer(vec![]);
        wtr.write(&[table.clone()])?;
        let data = wtr.into_inner()?;

        let read_back = CsvRecordReaderBuilder::new()
            .field_delimiter(';')
            .text_delimiter('\'')
            .from_bytes(data)
            .read_table()?;
        assert_eq!(read_back, table);
        Ok(())
    }
}
