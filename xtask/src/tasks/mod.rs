pub mod boot;
pub mod projects;
pub mod tooling;
