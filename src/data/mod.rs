pub mod clean;
pub mod csv;
pub mod vendor;

pub use clean::drop_null_columns;
pub use csv::CsvConnector;
pub use vendor::{excel_serial_to_date, MeltedRecord, VendorReshaper};
