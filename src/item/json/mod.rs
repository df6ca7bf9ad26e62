/// JSON output for lookup tables.
///
/// Tables serialize as nested objects (`{ "en": { "hello": "Hello" } }`),
/// so the output can be loaded back with `serde_json` into a
/// [`Table`](crate::core::table::Table).
///
/// # Examples
///
/// ```
/// use csv_table::core::item::ItemWriter;
/// use csv_table::item::csv::csv_reader::CsvRecordReaderBuilder;
/// use csv_table::item::json::json_writer::JsonTableWriterBuilder;
///
/// let table = CsvRecordReaderBuilder::new()
///     .from_bytes("key,en\nhello,Hello".as_bytes())
///     .read_table()
///     .unwrap();
///
/// let writer = JsonTableWriterBuilder::new().from_writer(vec![]);
/// writer.open().unwrap();
/// writer.write(&[table]).unwrap();
/// writer.close().unwrap();
///
/// let json = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(json, "[{\"en\":{\"hello\":\"Hello\"}}]\n");
/// ```

/// A module providing facilities for writing tables as JSON.
pub mod json_writer;
