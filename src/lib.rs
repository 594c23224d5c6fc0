pub mod backend;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod google;
pub mod identity;
pub mod logging;
pub mod models;
pub mod seed;
pub mod store;
