//! Built-in observers.
//!
//! Register [`IncidentObserver`] ahead of [`TracingObserver`] so the log
//! line carries the same incident id the client receives.

use axum::http::Request;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

use crate::fault::Fault;
use crate::recovery::Observer;

pub mod logging;

pub use logging::TracingObserver;

/// Correlates one recovered panic across logs and the client response.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IncidentId(Uuid);

impl IncidentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for IncidentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IncidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Attaches an [`IncidentId`] extension to the faulting request.
///
/// An id that is already present (e.g. from an outer layer) is kept.
#[derive(Clone, Copy, Debug, Default)]
pub struct IncidentObserver;

impl Observer for IncidentObserver {
    fn observe(&self, _fault: &Fault, request: &mut Request<()>) {
        if request.extensions().get::<IncidentId>().is_none() {
            request.extensions_mut().insert(IncidentId::new());
        }
    }
}
