pub mod error;
pub mod handlers;
pub mod ingestor;
pub mod models;
