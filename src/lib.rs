pub mod common;
pub mod database;
pub mod errors;
pub mod importer;
pub mod services;
pub mod storage;
pub mod utils;
