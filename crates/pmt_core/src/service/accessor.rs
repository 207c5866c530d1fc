//! Generic snapshot holder behind every accessor service.
//!
//! # Invariants
//! - The snapshot only moves `Empty -> Loaded` or `Loaded -> Loaded`.
//! - A failed refresh leaves the snapshot untouched and records the error.
//! - A successful refresh clears the recorded error.

use crate::backend::{Backend, BackendError, BackendResult};
use crate::service::signal::Signal;
use log::{debug, warn};

/// Latest projected value held by a service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Snapshot<T> {
    /// Nothing loaded yet.
    #[default]
    Empty,
    Loaded(T),
}

impl<T> Snapshot<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Empty => None,
        }
    }

    pub fn into_loaded(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Empty => None,
        }
    }
}

type Loader<'s, T> = Box<dyn Fn(&Backend<'s>) -> BackendResult<T> + 's>;

/// Pairs a projection query with the signal publishing its result.
pub struct Accessor<'s, T> {
    name: &'static str,
    backend: Backend<'s>,
    load: Loader<'s, T>,
    snapshot: Signal<Snapshot<T>>,
    last_error: Signal<Option<BackendError>>,
}

impl<'s, T> Accessor<'s, T> {
    /// Creates an accessor in the `Empty` state. Nothing is loaded yet.
    pub fn new(
        name: &'static str,
        backend: Backend<'s>,
        load: impl Fn(&Backend<'s>) -> BackendResult<T> + 's,
    ) -> Self {
        Self {
            name,
            backend,
            load: Box::new(load),
            snapshot: Signal::new(Snapshot::Empty),
            last_error: Signal::new(None),
        }
    }

    /// Re-runs the projection and publishes its result.
    pub fn refresh(&self) -> BackendResult<()> {
        match (self.load)(&self.backend) {
            Ok(value) => {
                self.snapshot.set(Snapshot::Loaded(value));
                if self.last_error.with(Option::is_some) {
                    self.last_error.set(None);
                }
                debug!(
                    "event=snapshot_refreshed module=service status=ok accessor={}",
                    self.name
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=snapshot_refreshed module=service status=error accessor={} error={}",
                    self.name, err
                );
                self.last_error.set(Some(err.clone()));
                Err(err)
            }
        }
    }

    /// Mutates a loaded snapshot in place; returns `false` when still `Empty`.
    pub fn patch(&self, f: impl FnOnce(&mut T)) -> bool {
        if !self.snapshot.with(Snapshot::is_loaded) {
            return false;
        }
        self.snapshot.update(|snapshot| {
            if let Snapshot::Loaded(value) = snapshot {
                f(value);
            }
        });
        true
    }

    /// Publishes a value computed elsewhere, e.g. returned by a command.
    pub fn publish(&self, value: T) {
        self.snapshot.set(Snapshot::Loaded(value));
    }

    pub fn snapshot(&self) -> &Signal<Snapshot<T>> {
        &self.snapshot
    }

    pub fn last_error(&self) -> &Signal<Option<BackendError>> {
        &self.last_error
    }

    pub fn backend(&self) -> Backend<'s> {
        self.backend
    }

    /// Records a command failure on the error signal and passes it through.
    pub fn track<R>(&self, result: BackendResult<R>) -> BackendResult<R> {
        if let Err(err) = &result {
            warn!(
                "event=command_failed module=service status=error accessor={} error={}",
                self.name, err
            );
            self.last_error.set(Some(err.clone()));
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::{Accessor, Snapshot};
    use crate::backend::{Backend, BackendError};
    use crate::model::entity::EntityKind;
    use crate::store::InMemoryStore;
    use std::cell::Cell;

    #[test]
    fn failed_refresh_keeps_previous_snapshot() {
        let store = InMemoryStore::new();
        let fail = Cell::new(false);
        let accessor = Accessor::new("counter", Backend::new(&store), |_| {
            if fail.get() {
                Err(BackendError::NotFound {
                    kind: EntityKind::Task,
                    id: 9,
                })
            } else {
                Ok(5_u32)
            }
        });
        assert_eq!(accessor.snapshot().get(), Snapshot::Empty);

        accessor.refresh().unwrap();
        fail.set(true);
        accessor.refresh().unwrap_err();

        assert_eq!(accessor.snapshot().get(), Snapshot::Loaded(5));
        assert!(accessor.last_error().get().is_some());

        fail.set(false);
        accessor.refresh().unwrap();
        assert!(accessor.last_error().get().is_none());
    }

    #[test]
    fn patch_is_ignored_while_empty() {
        let store = InMemoryStore::new();
        let accessor = Accessor::new("list", Backend::new(&store), |_| Ok(vec![1_u32]));
        assert!(!accessor.patch(|items| items.push(2)));

        accessor.refresh().unwrap();
        assert!(accessor.patch(|items| items.push(2)));
        assert_eq!(accessor.snapshot().get(), Snapshot::Loaded(vec![1, 2]));
    }
}
