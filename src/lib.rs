// SPDX-License-Identifier: MIT

//! Esclavizador client: track time against projects and tasks.
//!
//! This crate talks to the Esclavizador REST API and keeps a small durable
//! local state (session tokens plus a running-timer snapshot). The two core
//! pieces are [`auth::RefreshCoordinator`], which collapses concurrent token
//! refreshes into a single request, and [`timer::TimerEngine`], which
//! reconciles the server's running entry with the local snapshot and a
//! ticking display clock.

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod timer;

pub use api::ApiClient;
pub use config::Config;
pub use error::{AppError, Result};
pub use timer::{TimerEngine, TimerState};
