pub mod fs;
pub mod repo;
