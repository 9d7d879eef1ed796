pub mod export;
pub mod spreadsheet;

pub use self::export::{write_csv, write_plain_csv, ExportRow};
pub use self::spreadsheet::{load_target, resample, Cell, Sheet};
