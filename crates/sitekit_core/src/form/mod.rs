//! Headless form model, validation rules and anti-spam gate.
//!
//! # Responsibility
//! - Model the server-rendered form as plain data (`Page`, `Form`, `FormField`).
//! - Decide field validity and own per-field error display state.
//! - Detect automated submissions through a hidden decoy field.
//!
//! # Invariants
//! - Rule lookup is total: every field name maps to one rule or none.
//! - The decoy field is never validated and never part of a payload.

pub mod document;
pub mod field;
pub mod honeypot;
pub mod rules;
pub mod validator;
