//! Form submission lifecycle.
//!
//! # Responsibility
//! - Run the per-form submit state machine (validate, gate, dispatch, resolve).
//! - Define the outbound seams: transport and navigation.
//!
//! # Invariants
//! - At most one in-flight submission per form; the disabled submit control
//!   is the only guard.
//! - Every failure path re-enables the submit control.

pub mod controller;
pub mod navigator;
pub mod transport;
