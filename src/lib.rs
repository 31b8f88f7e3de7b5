//! rag-chat is a terminal client for a retrieval-augmented answer service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript, the single-flight request lifecycle, the
//!   background ask service and configuration.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`api`] defines the request and answer payloads exchanged with the
//!   service.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves the service target and
//! dispatches into [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
