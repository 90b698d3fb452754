//! Tabular report output
//!
//! Flattens the API's nested row/data-array shape into a flat table keyed by
//! dimension values, with one named column per requested metric. Tables
//! convert to JSON records, Arrow RecordBatches, Parquet files, and an
//! aligned text rendering for the CLI.

mod table;
mod writer;


pub use table::{
    order_metric_values, ReportTable, TableRow, PLACEHOLDER_ITEM_ID, PLACEHOLDER_VALUE,
};
pub use writer::{write_parquet, ParquetWriterConfig};
