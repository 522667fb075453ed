// The binary in main.rs drives the terminal UI; everything it needs lives
// here so integration tests and benchmarks can reach it.

pub mod app;
pub mod audio;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod event;
pub mod hint;
pub mod morse;
pub mod net;
pub mod session;
pub mod store;
pub mod ui;
