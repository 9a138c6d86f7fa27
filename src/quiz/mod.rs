pub mod countdown;
pub mod machine;
pub mod models;
pub mod parser;
pub mod results;
pub mod runner;
pub mod session;
