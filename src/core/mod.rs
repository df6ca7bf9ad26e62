/// Reader and writer traits shared by the step pipeline.
pub mod item;

/// Logical record tokenizer.
pub mod record;

/// Physical line cursor over a byte buffer.
pub mod scanner;

pub mod step;

/// Transposed lookup table and its assembler.
pub mod table;
