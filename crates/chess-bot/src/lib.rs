//! Chat bot for persistent two-player chess.
//!
//! Chat messages come in over HTTP, are parsed into [`commands::Command`]s and
//! run against a [`session::GameService`], which owns the game rules seam and
//! the record store.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod session;
