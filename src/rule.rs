pub mod import;
pub mod path;
