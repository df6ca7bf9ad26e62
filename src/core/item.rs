use crate::error::TableError;

/// Represents the result of reading an item from the reader.
///
/// `Ok(None)` signals that the reader is exhausted.
pub type ItemReaderResult<I> = Result<Option<I>, TableError>;

/// Represents the result of writing items to the writer.
pub type ItemWriterResult = Result<(), TableError>;

/// A trait for reading items one at a time.
///
/// Readers take `&self` and keep their cursor behind interior mutability, so
/// a single reader can be borrowed by a [`Step`](crate::core::step::Step)
/// while the caller still holds it.
pub trait ItemReader<I> {
    /// Reads the next item, or `Ok(None)` when there is nothing left.
    fn read(&self) -> ItemReaderResult<I>;
}

/// A trait for writing chunks of items.
pub trait ItemWriter<O> {
    /// Writes a chunk of items.
    fn write(&self, items: &[O]) -> ItemWriterResult;

    /// Flushes buffered output. Called after every chunk.
    fn flush(&self) -> ItemWriterResult {
        Ok(())
    }

    /// Called once before the first chunk.
    fn open(&self) -> ItemWriterResult {
        Ok(())
    }

    /// Called once after the last chunk.
    fn close(&self) -> ItemWriterResult {
        Ok(())
    }
}
