pub mod csv;
pub mod synthetic;

pub use csv::{load_csv, parse_csv, save_csv, CsvParseError};
pub use synthetic::{noisy_line, two_blobs};
