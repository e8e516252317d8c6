pub mod doctor;
pub mod projects;
