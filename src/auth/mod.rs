// SPDX-License-Identifier: MIT

//! Session credentials and token refresh.

pub mod credentials;
pub mod refresh;

pub use credentials::CredentialStore;
pub use refresh::RefreshCoordinator;
