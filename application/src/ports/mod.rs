//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod audit_logger;
pub mod extraction_source;
pub mod progress;
pub mod result_writer;
pub mod review_queue;
pub mod review_store;
