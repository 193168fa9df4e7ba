//! Roster API service.
//!
//! Serves the user resource over JSON/HTTP. Every endpoint under `/api`
//! answers with the [`roster_common::views::ApiResponse`] envelope.
//!
//! # Configuration
//!
//! See [`config::RosterApiConfig`] for the available flags and their
//! environment variable equivalents.

pub mod config;
pub mod context;
pub mod server;

pub(crate) mod error;
pub(crate) mod handlers;

#[cfg(test)]
pub(crate) mod test_support;
