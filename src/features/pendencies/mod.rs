pub mod phase;
pub mod scheduler;

pub use phase::{ReviewPhase, Severity};
pub use scheduler::{calculate_pendencies, rank_by_urgency, PendencyEntry};
