pub mod build;
pub mod iwyu;
