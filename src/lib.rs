//! Client-side synchronisation of a todo list with a remote REST collection,
//! plus the reference collection server it talks to.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod infrastructure;
