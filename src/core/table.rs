use std::{
    cell::RefCell,
    collections::{BTreeMap, btree_map::Entry},
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::{
    item::{ItemWriter, ItemWriterResult},
    record::Record,
};
use crate::error::TableError;

/// Transposed lookup table: header column -> row key -> cell.
///
/// For a localization sheet the outer key is the language and the inner key
/// the string identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table(BTreeMap<String, BTreeMap<String, String>>);

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the cell of `row_key` in the `column` mapping.
    pub fn get(&self, column: &str, row_key: &str) -> Option<&str> {
        self.0
            .get(column)
            .and_then(|rows| rows.get(row_key))
            .map(String::as_str)
    }

    pub fn column(&self, column: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(column)
    }

    pub fn outer_keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of outer keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.0
    }
}

impl From<BTreeMap<String, BTreeMap<String, String>>> for Table {
    fn from(map: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self(map)
    }
}

/// What to do when a row key shows up twice under the same column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with [`TableError::DuplicateKey`].
    #[default]
    Reject,
    /// Keep the last value written.
    Overwrite,
}

#[derive(Default)]
struct AssemblerState {
    header: Option<Record>,
    table: BTreeMap<String, BTreeMap<String, String>>,
}

/// Builds a [`Table`] from records written to it.
///
/// The first record is the header: cells 1.. name the columns, cell 0 is
/// ignored. Every later record contributes `cell 0 -> cell j` to the mapping
/// of header cell `j`, matched by position.
///
/// # Examples
///
/// ```
/// use csv_table::core::item::ItemWriter;
/// use csv_table::core::table::TableAssembler;
///
/// let assembler = TableAssembler::new();
/// let rows = vec![
///     vec!["key".to_string(), "en".to_string(), "fr".to_string()],
///     vec!["yes".to_string(), "Yes".to_string(), "Oui".to_string()],
/// ];
/// assembler.write(&rows).unwrap();
///
/// let table = assembler.into_table();
/// assert_eq!(table.get("fr", "yes"), Some("Oui"));
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Default)]
pub struct TableAssembler {
    policy: DuplicatePolicy,
    state: RefCell<AssemblerState>,
}

impl TableAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            state: RefCell::default(),
        }
    }

    pub fn into_table(self) -> Table {
        Table(self.state.into_inner().table)
    }

    fn add_record(&self, record: &Record) -> Result<(), TableError> {
        let mut guard = self.state.borrow_mut();
        let state = &mut *guard;

        let Some(header) = state.header.as_ref() else {
            for column in record.iter().skip(1) {
                if state.table.insert(column.clone(), BTreeMap::new()).is_some() {
                    warn!("Duplicate header '{}' replaces the earlier column", column);
                }
            }
            debug!("Header with {} columns", record.len());
            state.header = Some(record.clone());
            return Ok(());
        };
        let table = &mut state.table;

        let Some(row_key) = record.first() else {
            return Ok(());
        };

        for (index, cell) in record.iter().enumerate().skip(1) {
            let column = header.get(index).ok_or_else(|| TableError::ColumnOutOfRange {
                row_key: row_key.clone(),
                column: index,
                width: header.len(),
            })?;

            let rows = table.entry(column.clone()).or_default();
            match rows.entry(row_key.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(cell.clone());
                }
                Entry::Occupied(mut entry) => match self.policy {
                    DuplicatePolicy::Reject => {
                        return Err(TableError::DuplicateKey {
                            column: column.clone(),
                            row_key: row_key.clone(),
                        });
                    }
                    DuplicatePolicy::Overwrite => {
                        entry.insert(cell.clone());
                    }
                },
            }
        }

        Ok(())
    }
}

impl ItemWriter<Record> for TableAssembler {
    fn write(&self, items: &[Record]) -> ItemWriterResult {
        items.iter().try_for_each(|record| self.add_record(record))
    }
}
