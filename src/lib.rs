#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # csv-table

 A streaming CSV reader that turns spreadsheet-style exports into transposed
 lookup tables, typically localization sheets where every column after the
 first is a language and every row a string identifier.

 ## Core Concepts

- **ByteLineScanner:** A cursor over an owned byte buffer yielding one physical line per call. `\n` and `\r` each terminate a line.
- **RecordParser:** Assembles one logical record from one or more physical lines. Quoted fields may contain delimiters, doubled quotes and real line breaks.
- **TableAssembler:** Turns records into a `Table`: the header row names the columns, column 0 of every other row is the row key.
- **ItemReader / ItemWriter / Step:** The small pipeline used to pump records from a reader into any writer, chunk by chunk.

 ## Features

| **Feature**   | **Description**                                               |
|---------------|---------------------------------------------------------------|
| csv           | Enables the CSV table writer (`csv` crate)                    |
| json          | Enables the JSON table writer                                 |
| logger        | Enables a logger `ItemWriter`, useful for debugging purposes  |
| full          | Enables all available features                                |

 The reader itself is always available.

 ## Getting Started

```rust
use csv_table::{item::csv::csv_reader::CsvRecordReaderBuilder, TableError};

fn main() -> Result<(), TableError> {
    let csv = "key,English,French
hello,Hello,Bonjour
quote,\"He said \"\"hi\"\"\",\"Il a dit \"\"salut\"\"\"
multiline,\"first
second\",premier\\nsecond";

    let table = CsvRecordReaderBuilder::new()
        .from_bytes(csv.as_bytes())
        .read_table()?;

    assert_eq!(table.get("French", "hello"), Some("Bonjour"));
    assert_eq!(table.get("English", "quote"), Some("He said \"hi\""));
    assert_eq!(table.get("English", "multiline"), Some("first\nsecond"));
    assert_eq!(table.get("French", "multiline"), Some("premier\nsecond"));

    Ok(())
}
```

 ## Compatibility notes

 - The two characters backslash + `n` are read as a line break anywhere in
   the input, so a cell holding a Windows path such as `C:\new` is altered.
 - A `\r\n` pair is two terminators; inside a quoted field it becomes two
   line breaks.
 - A row key seen twice in one column is an error unless
   `DuplicatePolicy::Overwrite` is selected.
 - Invalid UTF-8 is replaced with U+FFFD unless `Utf8Policy::Strict` is
   selected.

 ## License
 Licensed under either of

 -   Apache License, Version 2.0
     ([LICENSE-APACHE](LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
 -   MIT license
     ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)

 at your option.
 */

/// Scanner, record parser, table and the reader/writer pipeline
pub mod core;

/// Error types for table reading
pub mod error;

#[doc(inline)]
pub use error::*;

/// Set of items readers / writers (csv reader, csv and json table writers)
pub mod item;
