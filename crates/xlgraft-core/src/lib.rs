pub mod error;
pub mod xml;
pub mod package;
pub mod sml;
pub mod sink;

pub use error::{GraftError, Result};

pub use sink::{DirectorySink, MemorySink, OutputSink};
pub use sml::{
    copy_sheet_into, copy_workbook, CopyOutcome, CopyReport, CopySettings, Drawing, StyleIdentity,
    Workbook, Worksheet,
};
