pub mod connection;
pub mod entities;
