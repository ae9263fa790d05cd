//! Participant transcript domain.
//!
//! - [`entities::Transcript`] - a participant's append-only, first-person message log
//! - [`entities::Message`] - a single role-tagged entry
//! - [`stream::StreamEvent`] - incremental events of a streaming model response

pub mod entities;
pub mod stream;
