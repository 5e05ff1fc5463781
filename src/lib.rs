//! Chinese lunar calendar for the terminal

pub mod cli;
pub mod render;
pub mod services;
pub mod types;
