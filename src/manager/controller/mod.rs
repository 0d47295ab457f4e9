//! Session controller implementation
//!
//! This module is organized into logical submodules:
//! - `core`: Core struct, constructor, idle waiting and shutdown
//! - `start`: Session start intent and callback wiring
//! - `stop`: Session stop intent
//! - `info`: Status and log queries

mod core;
mod info;
mod start;
mod stop;

pub use self::core::SessionController;
