pub mod api;
pub mod app;
pub mod assistant;
pub mod config;
pub mod detail;
pub mod directory;
pub mod edits;
pub mod email;
pub mod fixtures;
pub mod gateway;
pub mod operations;
pub mod prompt;
pub mod store;
pub mod workspace;
