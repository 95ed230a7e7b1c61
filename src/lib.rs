pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod flashcard;
pub mod handlers;
pub mod loader;
pub mod session;
pub mod state;

#[cfg(test)]
pub mod testing;
