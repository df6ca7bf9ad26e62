/// CSV support for reading lookup tables and writing them back.
///
/// # Module Architecture
///
/// 1. **CsvRecordReader**: tokenizes logical records from an in-memory
///    buffer (quoted fields may hold delimiters, doubled quotes and line
///    breaks) and assembles them into a [`Table`](crate::core::table::Table).
///    It implements `ItemReader`, so it can also feed any `ItemWriter`
///    through a `Step`.
///
/// 2. **CsvTableWriter** (`csv` feature): writes tables in the same
///    header-row layout, using the `csv` crate.
///
/// # Dialect
///
/// - Field and text delimiters are configurable (`,` and `"` by default)
/// - `\n` and `\r` each end a physical line; a `\r\n` pair counts as two
/// - The two characters backslash + `n` are always read as a line break,
///   even outside quotes
/// - A trailing field delimiter does not add an empty cell
/// - Cells are never trimmed or converted
///
/// # Examples
///
/// ```
/// use csv_table::item::csv::csv_reader::CsvRecordReaderBuilder;
///
/// let csv_data = "\
/// key,English,French
/// greeting,Hello,Bonjour
/// farewell,\"Good
/// bye\",\"Au \"\"revoir\"\"\"
/// ";
///
/// let table = CsvRecordReaderBuilder::new()
///     .from_bytes(csv_data.as_bytes())
///     .read_table()
///     .unwrap();
///
/// assert_eq!(table.get("English", "greeting"), Some("Hello"));
/// assert_eq!(table.get("English", "farewell"), Some("Good\nbye"));
/// assert_eq!(table.get("French", "farewell"), Some("Au \"revoir\""));
/// ```

/// A module providing facilities for reading CSV records and tables.
pub mod csv_reader;

#[cfg(feature = "csv")]
/// A module providing facilities for writing tables as CSV.
pub mod csv_writer;
