pub mod csv;
pub mod split;

pub use self::csv::{CsvOptions, load_csv, load_csv_from_reader};
pub use split::train_test_split;
