pub mod client;
pub mod config;
pub mod generation;
pub mod health;
pub mod ingest;
pub mod mw;
pub mod prompt;
pub mod quiz;
pub mod server;

#[cfg(test)]
mod tests;
