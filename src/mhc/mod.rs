pub mod errors;
pub mod models;
pub mod tasks;
pub mod utility;
