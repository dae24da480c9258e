//! Hypermedia REST API for events and the areas that host them.
//!
//! Every representation is a Mason document whose controls describe how to
//! navigate to, create, edit and delete related resources.

pub mod config;
pub mod constants;
pub mod db;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod schema;
pub mod state;
pub mod utils;
