pub mod audio;
pub mod cli;
pub mod config;
pub mod global;
pub mod screen;
