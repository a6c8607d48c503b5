//! Tauri IPC commands
//!
//! All commands exposed to the frontend via Tauri's invoke system.

pub mod prices;
pub mod refresh;
pub mod alerts;
pub mod history;
pub mod settings;
