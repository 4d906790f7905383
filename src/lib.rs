//! Library crate for reveal-round, the client-side controller of a daily
//! "guess the song" round where clearer audio versions are revealed one rung
//! at a time.
//!
//! Start with [`services::session_service::SessionController`] for the round
//! itself and [`services::autocomplete_service::AutocompleteController`] for
//! the guess field.

pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod services;
pub mod state;
