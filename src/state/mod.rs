/// Ordered rung list and reveal depth.
pub mod ladder;
/// Broadcast hub for round notices.
pub mod notices;
/// Round key, scored state and persisted progress.
pub mod round;
/// Score decay rule.
pub mod score;
/// Round lifecycle state machine.
pub mod state_machine;

pub use self::notices::NoticeHub;
