/// Debounced search dropdown used to build a guess.
pub mod autocomplete_service;
/// Contracts of the remote services a round depends on.
pub mod collaborators;
/// HTTP implementation of every remote collaborator.
#[cfg(feature = "http-backend")]
pub mod http;
/// Round controller: reveal, scoring, submission and persistence.
pub mod session_service;
