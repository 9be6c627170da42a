//! Progress reporting for catalog compilation
//!
//! This trait allows the declarative crate to be used without depending
//! on a specific terminal UI.

use crate::error::Error;
use crate::types::ResourceRef;

/// Progress callback for compile operations
///
/// Implement this trait to receive progress updates during compilation.
pub trait ProgressCallback: Send {
    /// Called before any request is built
    fn on_start(&mut self, count: usize);

    /// Called once per request, in request order
    fn on_resource_complete(&mut self, resource: &ResourceRef, error: Option<&Error>);

    /// Called when every request has been handled
    fn on_complete(&mut self, compiled: usize, failed: usize);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_start(&mut self, _count: usize) {}
    fn on_resource_complete(&mut self, _resource: &ResourceRef, _error: Option<&Error>) {}
    fn on_complete(&mut self, _compiled: usize, _failed: usize) {}
}

/// Progress callback that writes to the `log` facade
pub struct LogProgress;

impl ProgressCallback for LogProgress {
    fn on_start(&mut self, count: usize) {
        log::debug!("compiling {count} resource(s)");
    }

    fn on_resource_complete(&mut self, resource: &ResourceRef, error: Option<&Error>) {
        match error {
            None => log::debug!("{resource}: ok"),
            Some(e) => log::debug!("{resource}: failed ({})", e.category()),
        }
    }

    fn on_complete(&mut self, compiled: usize, failed: usize) {
        log::debug!("compiled {compiled} resource(s), {failed} failed");
    }
}
