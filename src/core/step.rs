use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::error::TableError;

use super::item::{ItemReader, ItemWriter};

/// Timing and counters of one step run.
#[derive(Debug)]
pub struct StepExecution {
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    pub read_count: usize,
    pub write_count: usize,
}

#[derive(Debug, PartialEq)]
enum ChunkStatus {
    Finished,
    Full,
}

/// Pumps every item of a reader into a writer, chunk by chunk.
///
/// The first read or write error stops the step and is returned to the
/// caller; nothing is skipped.
///
/// # Examples
///
/// ```
/// use csv_table::core::step::StepBuilder;
/// use csv_table::core::table::TableAssembler;
/// use csv_table::item::csv::csv_reader::CsvRecordReaderBuilder;
///
/// let reader = CsvRecordReaderBuilder::new().from_bytes("key,en\nhello,Hello".as_bytes());
/// let assembler = TableAssembler::new();
///
/// let step = StepBuilder::new("load")
///     .reader(&reader)
///     .writer(&assembler)
///     .chunk(10)
///     .build()
///     .unwrap();
///
/// let execution = step.execute().unwrap();
/// assert_eq!(execution.read_count, 2);
/// assert_eq!(assembler.into_table().get("en", "hello"), Some("Hello"));
/// ```
pub struct Step<'a, I> {
    name: String,
    reader: &'a dyn ItemReader<I>,
    writer: &'a dyn ItemWriter<I>,
    chunk_size: usize,
}

impl<I> Step<'_, I> {
    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn execute(&self) -> Result<StepExecution, TableError> {
        let start = Instant::now();

        info!("Start of step: {}", self.name);

        self.writer.open()?;

        let mut items: Vec<I> = Vec::with_capacity(self.chunk_size);
        let mut read_count = 0;
        let mut write_count = 0;

        loop {
            let status = match self.read_chunk(&mut items) {
                Ok(status) => status,
                Err(err) => {
                    error!("Error occured during read item: {}", err);
                    return Err(err);
                }
            };
            read_count += items.len();

            if !items.is_empty() {
                if let Err(err) = self.write_chunk(&items) {
                    error!("ItemWriter error: {}", err);
                    return Err(err);
                }
                write_count += items.len();
            }

            if status == ChunkStatus::Finished {
                break;
            }
        }

        self.writer.close()?;

        info!(
            "End of step: {}, read: {}, written: {}",
            self.name, read_count, write_count
        );

        Ok(StepExecution {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            read_count,
            write_count,
        })
    }

    fn read_chunk(&self, items: &mut Vec<I>) -> Result<ChunkStatus, TableError> {
        debug!("Start reading chunk");
        items.clear();

        loop {
            match self.reader.read()? {
                Some(item) => {
                    items.push(item);
                    if items.len() == self.chunk_size {
                        debug!("End reading chunk: FULL");
                        return Ok(ChunkStatus::Full);
                    }
                }
                None => {
                    debug!("End reading chunk: FINISHED");
                    return Ok(ChunkStatus::Finished);
                }
            }
        }
    }

    fn write_chunk(&self, items: &[I]) -> Result<(), TableError> {
        debug!("Start writing chunk of {} items", items.len());
        self.writer.write(items)?;
        self.writer.flush()?;
        debug!("End writing chunk");
        Ok(())
    }
}

pub struct StepBuilder<'a, I> {
    name: String,
    reader: Option<&'a dyn ItemReader<I>>,
    writer: Option<&'a dyn ItemWriter<I>>,
    chunk_size: usize,
}

impl<'a, I> StepBuilder<'a, I> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            reader: None,
            writer: None,
            chunk_size: 1,
        }
    }

    pub fn reader(mut self, reader: &'a impl ItemReader<I>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn writer(mut self, writer: &'a impl ItemWriter<I>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Number of items read before each write. Values below 1 are raised to 1.
    pub fn chunk(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn build(self) -> Result<Step<'a, I>, TableError> {
        let reader = self
            .reader
            .ok_or_else(|| TableError::Step(format!("{}: no reader configured", self.name)))?;
        let writer = self
            .writer
            .ok_or_else(|| TableError::Step(format!("{}: no writer configured", self.name)))?;

        Ok(Step {
            name: self.name,
            reader,
            writer,
            chunk_size: self.chunk_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::StepBuilder;
    use crate::{
        core::item::{ItemReader, ItemReaderResult, ItemWriter, ItemWriterResult},
        error::TableError,
    };

    struct VecReader {
        items: RefCell<Vec<u32>>,
        fail_at: Option<u32>,
    }

    impl ItemReader<u32> for VecReader {
        fn read(&self) -> ItemReaderResult<u32> {
            let mut items = self.items.borrow_mut();
            if items.is_empty() {
                return Ok(None);
            }
            let item = items.remove(0);
            if Some(item) == self.fail_at {
                return Err(TableError::ItemReader(format!("bad item {}", item)));
            }
            Ok(Some(item))
        }
    }

    #[derive(Default)]
    struct VecWriter {
        chunks: RefCell<Vec<Vec<u32>>>,
        events: RefCell<Vec<&'static str>>,
    }

    impl ItemWriter<u32> for VecWriter {
        fn write(&self, items: &[u32]) -> ItemWriterResult {
            self.chunks.borrow_mut().push(items.to_vec());
            Ok(())
        }

        fn open(&self) -> ItemWriterResult {
            self.events.borrow_mut().push("open");
            Ok(())
        }

        fn close(&self) -> ItemWriterResult {
            self.events.borrow_mut().push("close");
            Ok(())
        }
    }

    fn reader(items: Vec<u32>, fail_at: Option<u32>) -> VecReader {
        VecReader {
            items: RefCell::new(items),
            fail_at,
        }
    }

    #[test]
    fn items_are_written_in_chunks() -> Result<(), TableError> {
        let reader = reader(vec![1, 2, 3, 4, 5], None);
        let writer = VecWriter::default();

        let step = StepBuilder::new("chunks")
            .reader(&reader)
            .writer(&writer)
            .chunk(2)
            .build()?;
        let execution = step.execute()?;

        assert_eq!(step.get_name(), "chunks");
        assert_eq!(execution.read_count, 5);
        assert_eq!(execution.write_count, 5);
        assert_eq!(
            *writer.chunks.borrow(),
            vec![vec![1, 2], vec![3, 4], vec![5]]
        );
        assert_eq!(*writer.events.borrow(), vec!["open", "close"]);
        Ok(())
    }

    #[test]
    fn read_error_stops_the_step() {
        let reader = reader(vec![1, 2, 3], Some(2));
        let writer = VecWriter::default();

        let step = StepBuilder::new("failing")
            .reader(&reader)
            .writer(&writer)
            .build()
            .unwrap();

        assert!(matches!(step.execute(), Err(TableError::ItemReader(_))));
        assert_eq!(*writer.chunks.borrow(), vec![vec![1]]);
        assert_eq!(*writer.events.borrow(), vec!["open"]);
    }

    #[test]
    fn empty_reader_writes_nothing() -> Result<(), TableError> {
        let reader = reader(vec![], None);
        let writer = VecWriter::default();

        let step = StepBuilder::new("empty")
            .reader(&reader)
            .writer(&writer)
            .chunk(0)
            .build()?;
        let execution = step.execute()?;

        assert_eq!(execution.read_count, 0);
        assert!(writer.chunks.borrow().is_empty());
        Ok(())
    }

    #[test]
    fn missing_writer_is_a_configuration_error() {
        let reader = reader(vec![], None);
        let result = StepBuilder::<u32>::new("incomplete").reader(&reader).build();
        assert!(matches!(result, Err(TableError::Step(_))));
    }
}
