pub mod error;
pub mod params;
pub mod table_reader;
pub mod types;
