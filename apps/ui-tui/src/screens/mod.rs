#![cfg(feature = "tui")]
pub mod cases;
pub mod chat;
pub mod email;
