mod csv_file;
mod quandl;

pub use csv_file::CsvFileSource;
pub use quandl::QuandlSource;
