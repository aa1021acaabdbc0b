//! Feedback channel back to the invoker.
//!
//! The command map never formats user-facing text itself: it emits message
//! keys plus string arguments and leaves localization to the sink.

pub mod keys;
mod sink;

pub use sink::{ConsoleFeedback, FeedbackMessage, FeedbackSink, MemoryFeedback};
