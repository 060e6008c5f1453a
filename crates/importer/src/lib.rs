pub mod columns;
pub mod error;
pub mod roster;

pub use columns::{ColumnMap, RosterColumn};
pub use error::{ImporterError, Result};
pub use roster::{RosterImport, merge_into, parse_rows, read_csv_rows};
