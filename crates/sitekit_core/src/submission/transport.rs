//! Outbound submission transport.
//!
//! The remote endpoint is opaque: it accepts field key/value pairs and
//! either succeeds or fails. Timeouts, missing connectivity and remote
//! rejections are all plain failures to the pipeline.

use crate::form::document::Form;
use serde::Serialize;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Field values sent for one submission attempt.
///
/// Keys are field names; a repeated name keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubmissionPayload {
    fields: BTreeMap<String, String>,
}

impl SubmissionPayload {
    /// Collects submittable fields of `form`, leaving out `decoy_name`.
    ///
    /// Values are taken as entered (untrimmed); unchecked checkboxes are skipped.
    pub fn from_form(form: &Form, decoy_name: &str) -> Self {
        let fields = form
            .fields()
            .iter()
            .filter(|field| field.name != decoy_name && field.is_submittable())
            .map(|field| (field.name.clone(), field.value.clone()))
            .collect();
        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// JSON object body for HTTP-style transports.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Reasons a submission did not reach the endpoint or was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    Offline,
    Timeout,
    Rejected(String),
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offline => write!(f, "no network connection"),
            Self::Timeout => write!(f, "submission timed out"),
            Self::Rejected(reason) => write!(f, "submission rejected: {reason}"),
        }
    }
}

impl Error for TransportError {}

/// Delivers one payload to the remote endpoint.
pub trait SubmissionTransport {
    fn send(&mut self, payload: &SubmissionPayload) -> Result<(), TransportError>;
}

/// Shared online/offline flag, the headless stand-in for `navigator.onLine`.
#[derive(Debug, Clone)]
pub struct Connectivity {
    online: Rc<Cell<bool>>,
}

impl Connectivity {
    pub fn online() -> Self {
        Self {
            online: Rc::new(Cell::new(true)),
        }
    }

    pub fn offline() -> Self {
        Self {
            online: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_online(&self) -> bool {
        self.online.get()
    }

    pub fn set_online(&self, online: bool) {
        self.online.set(online);
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::online()
    }
}

/// Endpoint stand-in that accepts every payload while online.
#[derive(Debug, Clone, Default)]
pub struct OfflineAwareTransport {
    connectivity: Connectivity,
}

impl OfflineAwareTransport {
    pub fn new(connectivity: Connectivity) -> Self {
        Self { connectivity }
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }
}

impl SubmissionTransport for OfflineAwareTransport {
    fn send(&mut self, _payload: &SubmissionPayload) -> Result<(), TransportError> {
        if self.connectivity.is_online() {
            Ok(())
        } else {
            Err(TransportError::Offline)
        }
    }
}
