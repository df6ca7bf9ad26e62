//! Mock versions of std::fs::File and of a record reader.
use mockall::mock;

use std::io::{self, Write};

use csv_table::core::item::{ItemReader, ItemReaderResult};

mock! {
    pub File {}
    impl Write for File {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

mock! {
    pub RecordReader {}
    impl ItemReader<Vec<String>> for RecordReader {
        fn read(&self) -> ItemReaderResult<Vec<String>>;
    }
}
