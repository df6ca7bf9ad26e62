use std::{
    cell::{Cell, RefCell},
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    core::{
        item::{ItemWriter, ItemWriterResult},
        table::Table,
    },
    error::TableError,
};

/// Writes tables as a JSON array of `{ column: { row key: cell } }` objects.
///
/// `open` writes the opening bracket and `close` the closing one; tables
/// written in between are comma separated.
pub struct JsonTableWriter<W: Write> {
    stream: RefCell<BufWriter<W>>,
    use_pretty_formatter: bool,
    is_first_item: Cell<bool>,
}

impl<W: Write> JsonTableWriter<W> {
    fn write_bytes(&self, bytes: &[u8]) -> ItemWriterResult {
        self.stream
            .borrow_mut()
            .write_all(bytes)
            .map_err(|error| TableError::ItemWriter(error.to_string()))
    }

    pub fn into_inner(self) -> Result<W, TableError> {
        self.stream
            .into_inner()
            .into_inner()
            .map_err(|error| TableError::ItemWriter(error.to_string()))
    }
}

impl<W: Write> ItemWriter<Table> for JsonTableWriter<W> {
    fn write(&self, items: &[Table]) -> ItemWriterResult {
        for table in items {
            if !self.is_first_item.get() {
                let separator: &[u8] = if self.use_pretty_formatter { b",\n" } else { b"," };
                self.write_bytes(separator)?;
            }
            self.is_first_item.set(false);

            let json = if self.use_pretty_formatter {
                serde_json::to_string_pretty(table)
            } else {
                serde_json::to_string(table)
            }
            .map_err(|error| TableError::ItemWriter(error.to_string()))?;

            self.write_bytes(json.as_bytes())?;
        }
        Ok(())
    }

    fn flush(&self) -> ItemWriterResult {
        self.stream
            .borrow_mut()
            .flush()
            .map_err(|error| TableError::ItemWriter(error.to_string()))
    }

    fn open(&self) -> ItemWriterResult {
        self.is_first_item.set(true);
        let bracket: &[u8] = if self.use_pretty_formatter { b"[\n" } else { b"[" };
        self.write_bytes(bracket)
    }

    fn close(&self) -> ItemWriterResult {
        let bracket: &[u8] = if self.use_pretty_formatter { b"\n]\n" } else { b"]\n" };
        self.write_bytes(bracket)?;
        self.flush()
    }
}

#[derive(Default)]
pub struct JsonTableWriterBuilder {
    pretty_formatter: bool,
}

impl JsonTableWriterBuilder {
    pub fn new() -> JsonTableWriterBuilder {
        JsonTableWriterBuilder {
            pretty_formatter: false,
        }
    }

    pub fn pretty_formatter(mut self, yes: bool) -> JsonTableWriterBuilder {
        self.pretty_formatter = yes;
        self
    }

    pub fn from_writer<W: Write>(self, wtr: W) -> JsonTableWriter<W> {
        JsonTableWriter {
            stream: RefCell::new(BufWriter::new(wtr)),
            use_pretty_formatter: self.pretty_formatter,
            is_first_item: Cell::new(true),
        }
    }

    /// Creates (or truncates) the file at `path`.
    pub fn from_path<P: AsRef<Path>>(self, path: P) -> Result<JsonTableWriter<File>, TableError> {
        let file = File::create(path)?;
        Ok(self.from_writer(file))
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::JsonTableWriterBuilder;
    use crate::{core::item::ItemWriter, item::csv::csv_reader::CsvRecordReaderBuilder};

    #[test]
    fn tables_are_written_as_an_array() -> Result<(), Box<dyn Error>> {
        let first = CsvRecordReaderBuilder::new()
            .from_bytes("key,en\na,1".as_bytes())
            .read_table()?;
        let second = CsvRecordReaderBuilder::new()
            .from_bytes("key,fr\nb,2".as_bytes())
            .read_table()?;

        let writer = JsonTableWriterBuilder::new().from_writer(vec![]);
        writer.open()?;
        writer.write(&[first])?;
        writer.write(&[second])?;
        writer.close()?;

        let data = String::from_utf8(writer.into_inner()?)?;
        assert_eq!(data, "[{\"en\":{\"a\":\"1\"}},{\"fr\":{\"b\":\"2\"}}]\n");
        Ok(())
    }

    #[test]
    fn pretty_output_is_valid_json() -> Result<(), Box<dyn Error>> {
        let table = CsvRecordReaderBuilder::new()
            .from_bytes("key,en\na,\"x\ny\"".as_bytes())
            .read_table()?;

        let writer = JsonTableWriterBuilder::new()
            .pretty_formatter(true)
            .from_writer(vec![]);
        writer.open()?;
        writer.write(&[table.clone()])?;
        writer.close()?;

        let data = writer.into_inner()?;
        let parsed: Vec<crate::core::table::Table> = serde_json::from_slice(&data)?;
        assert_eq!(parsed, vec![table]);
        Ok(())
    }
}
