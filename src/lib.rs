//! Hebrew typing tutor: a letter-pair curriculum, generated drill text, live
//! typing speed and spoken prompts with a synthesis fallback.
//!
//! The binary in `main.rs` drives a terminal UI on top of these modules.

pub mod app;
pub mod config;
pub mod data;
pub mod engine;
pub mod event;
pub mod generator;
pub mod keyboard;
pub mod logging;
pub mod session;
pub mod speech;
pub mod store;
pub mod ui;
