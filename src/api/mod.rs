// SPDX-License-Identifier: MIT

//! HTTP client for the Esclavizador API.
//!
//! [`client`] holds the transport and the 401 interceptor; the sibling
//! modules add one `impl ApiClient` block per API resource.

mod auth;
mod client;
mod projects;
mod reports;
mod tags;
mod tasks;
mod time_entries;
mod users;

pub use client::ApiClient;
