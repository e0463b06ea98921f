#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Conversation session management for the textbook assistant widget.
//!
//! # Key Features
//! - Append-only conversation log seeded with a welcome message
//! - Fixed six-message history window sent as backend context
//! - Busy gate that rejects submissions while a query is outstanding
//! - Uniform failure notice whatever made a query fail

mod controller;
mod state;
mod store;

pub use controller::{
    ERROR_NOTICE, InFlightQuery, SessionConfig, SessionController, Settlement, WELCOME_MESSAGE,
};
pub use state::{Phase, SessionState};
pub use store::{ConversationStore, HISTORY_WINDOW, LogStats};
