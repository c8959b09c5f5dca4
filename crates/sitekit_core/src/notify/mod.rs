//! Transient user notifications.
//!
//! # Responsibility
//! - Display independent, dismissible, auto-expiring messages.
//! - Expose the single `notify(message, severity)` sink the pipeline consumes.
//!
//! # Invariants
//! - No dedup, no coalescing, no cap.
//! - Removal is always fade first, detach after the fade delay.
//! - Hiding or detaching an unknown notification is a no-op.

pub mod channel;
