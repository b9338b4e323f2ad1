// Library for tests to access modules

pub mod config;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod pool;
pub mod report;
pub mod routes;
pub mod summary_repo;
pub mod ui_state;
pub mod version;
pub mod worker;
