/// Reveal progress persistence (local and server-backed).
pub mod progress_store;
/// Storage error types shared by every progress store.
pub mod storage;
