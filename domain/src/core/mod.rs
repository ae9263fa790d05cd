//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] - configuration errors raised while assembling an episode
//! - [`escape`] - outbound `$` / `*` filter and its inverse
//! - [`string`] - small text helpers

pub mod error;
pub mod escape;
pub mod string;
