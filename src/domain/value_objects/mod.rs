mod file_name;

pub use file_name::FileName;
