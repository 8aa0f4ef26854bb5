//! Use cases
//!
//! - [`reconcile_document`]: sources -> consensus -> review tasks -> final annotations
//! - [`reconcile_batch`]: the same over many documents, bounded concurrency
//! - [`apply_reviews`]: fold reviewed tasks into the review store
//! - [`review_session`]: list, decide, skip and report on review tasks

pub mod apply_reviews;
pub mod reconcile_batch;
pub mod reconcile_document;
pub mod review_session;
