//! Callers of the scheduler and the library views built around them.
pub mod digest;
pub mod import;
pub mod library;
pub mod notes;
pub mod review;
pub mod stats;

pub use digest::{latest_digest_for_user, schedule_digest};
pub use import::{ImportResult, process_highlight_import};
pub use library::list_library;
pub use notes::create_manual_note;
pub use review::{review_queue, submit_review_feedback};
pub use stats::{LibraryStats, library_stats};
