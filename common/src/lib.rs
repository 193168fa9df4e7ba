//! Types shared between the roster API, its storage layer and the operator
//! CLI.
//!
//! [`params`] holds the input shapes accepted from clients together with
//! their validators, [`views`] holds everything that is sent back, including
//! the [`views::ApiResponse`] envelope every endpoint answers with.

pub mod params;
pub mod validation;
pub mod views;
