mod csv_file_loader;
mod parser;

pub use csv_file_loader::{CsvOptions, load_csv, load_csv_from_reader};
