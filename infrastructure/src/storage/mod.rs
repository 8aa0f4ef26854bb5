//! File-backed review state
//!
//! - [`JsonReviewStore`]: durable subject -> decision mapping
//! - [`JsonReviewQueue`]: pending and reviewed tasks awaiting merge

mod atomic;
mod json_review_queue;
mod json_review_store;

pub use atomic::write_json_atomic;
pub use json_review_queue::JsonReviewQueue;
pub use json_review_store::JsonReviewStore;
