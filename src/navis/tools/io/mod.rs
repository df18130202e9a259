pub mod csv_write;
pub mod excel_write;
pub mod input;
pub mod xml_read;

