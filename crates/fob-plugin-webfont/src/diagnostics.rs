//! Where problems found outside a hook are reported.
//!
//! Errors inside a hook go into the [`Compilation`](crate::Compilation). Watcher
//! errors and failed out-of-band regenerations have no compilation to go to, so
//! they are handed to a [`DiagnosticsSink`].

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, warn};

use crate::host::{HostDiagnostic, Severity};

pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, diagnostic: HostDiagnostic);
}

/// Logs diagnostics through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, diagnostic: HostDiagnostic) {
        match diagnostic.severity {
            Severity::Error => error!("{}", diagnostic),
            Severity::Warning => warn!("{}", diagnostic),
        }
    }
}

/// Keeps diagnostics in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    diagnostics: Arc<Mutex<Vec<HostDiagnostic>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything reported so far
    pub fn take(&self) -> Vec<HostDiagnostic> {
        std::mem::take(&mut *self.diagnostics.lock())
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for CollectingSink {
    fn report(&self, diagnostic: HostDiagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }
}

impl<T: DiagnosticsSink + ?Sized> DiagnosticsSink for Arc<T> {
    fn report(&self, diagnostic: HostDiagnostic) {
        (**self).report(diagnostic)
    }
}
