pub mod digest;
pub mod highlight;
pub mod import_job;
pub mod payloads;
pub mod queue;
pub mod rating;
pub mod review_state;
pub mod scheduler;

pub use digest::{DigestAction, DigestPreview};
pub use highlight::{Highlight, HighlightSource, NewHighlight};
pub use import_job::{ImportJob, ImportStatus};
pub use payloads::{
    DigestRequestPayload, HighlightImportPayload, ImportEntry, NotePayload, ReviewFeedbackPayload,
};
pub use queue::{QueueItem, RecommendedAction, select_due};
pub use rating::Rating;
pub use review_state::{MIN_EASE_FACTOR, ReviewState};
pub use scheduler::{SchedulerError, compute_next_review, initial_review_state};
