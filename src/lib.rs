//! Tabdock: ordered browser tab collections kept consistent while tabs are
//! dragged between independently running windows.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
