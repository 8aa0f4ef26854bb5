//! Span location in document text
//!
//! Pure functions: find literal occurrences of a subject and build the
//! sentence window shown to a reviewer. Only the first occurrence of a
//! subject is used for context; repeated occurrences are not windowed
//! separately.

pub mod locator;

pub use locator::{
    ContextWindow, Span, context_for, full_sentence, highlight_first, locate, locate_all,
    sentence_window,
};
