//! Server-rendered pages for browsing and managing events backed by a
//! remote REST API.

pub mod api;
pub mod cli;
pub mod config;
pub mod form;
pub mod logging;
pub mod models;
pub mod pages;
pub mod server;
pub mod session;
pub mod state;
pub mod views;
