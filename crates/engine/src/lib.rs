//! Referential-integrity engine for the costume backend.
//!
//! Every operation enters through [`Engine`]: the caller is checked by the
//! [`gate`], mutations of references go through the [`graph`] maintainer, and
//! deletes run the [`cascade`] state machine. The engine only talks to
//! persistence through [`EntityStore`], so it runs unchanged against
//! PostgreSQL or the in-memory store.

pub mod caller;
pub mod cascade;
pub mod gate;
pub mod graph;
pub mod integrity;
pub mod ops;

use std::sync::Arc;

use costume_core::error::{CoreError, CoreResult};
use costume_db::models::{Entity, Record};
use costume_db::EntityStore;
use tokio::sync::Mutex;

pub use caller::Caller;
pub use cascade::{CascadeReport, Detachment};
pub use integrity::{IntegrityReport, Violation};

/// Entry point for every domain operation.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn EntityStore>,
    /// Held from reading a character's costume numbers until the chosen
    /// number is written.
    numbering: Arc<Mutex<()>>,
}

impl Engine {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            numbering: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &dyn EntityStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

/// Narrow a [`Record`] to its typed model.
pub(crate) fn typed<T: Entity>(record: Record) -> CoreResult<T> {
    let kind = record.kind();
    T::from_record(record).ok_or_else(|| {
        CoreError::Validation(format!("expected a {} record, found a {kind}", T::KIND))
    })
}
