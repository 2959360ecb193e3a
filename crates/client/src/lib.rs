//! Client code for exocortex.
//!
//! This crate provides the HTTP network the router fetches through and the
//! chat daemon client shared by the server and CLI.

pub mod chat;
pub mod fetch;

pub use chat::{ChatClient, ChatConfig, ChatError, ChatTurn};
pub use fetch::{FetchClient, FetchConfig};
