/// loading of sample lists from CSV files
pub mod load_from_file;
