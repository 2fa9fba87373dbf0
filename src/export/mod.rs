pub mod json;

pub use json::{export_highlights_to_path, import_payload_from_path};
