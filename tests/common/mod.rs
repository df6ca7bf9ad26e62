pub mod mocks;

#[allow(unused_imports)]
pub use mocks::*;

/// Builds an owned record from string slices.
#[allow(dead_code)]
pub fn record(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}
