//! `LiveResponder` (port): a single callable mapping a request to a finite
//! ordered sequence of response chunks.
//!
//! Modeled as a first-class function bound, not an interface — the port has
//! one operation and no lifecycle, so any closure or stateful callable can
//! be plugged in directly (spec §9: "Callable port vs interface").

use crate::chunk::ResponseChunk;
use crate::errors::InterposerError;
use crate::request::Request;

/// Produces responses from a real upstream when recording.
///
/// The broker always fully drains the returned chunks before recording or
/// surfacing anything (spec §4.5's forward-buffer-record-persist-stream), so
/// implementations are free to produce chunks incrementally without losing
/// anything by doing so.
pub trait LiveResponder {
    fn respond(&self, request: &Request) -> Result<Vec<ResponseChunk>, InterposerError>;
}

impl<F> LiveResponder for F
where
    F: Fn(&Request) -> Result<Vec<ResponseChunk>, InterposerError>,
{
    fn respond(&self, request: &Request) -> Result<Vec<ResponseChunk>, InterposerError> {
        (self)(request)
    }
}
