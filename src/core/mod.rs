pub mod app;
pub mod ask_service;
pub mod config;
pub mod constants;
pub mod message;
pub mod text_wrapping;
pub mod transcript;
