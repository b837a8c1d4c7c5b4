pub mod app;
pub mod bot;
pub mod cli;
pub mod command;
pub mod config;
pub mod global;
pub mod meeting;
pub mod notes;
pub mod room;
pub mod transport;
