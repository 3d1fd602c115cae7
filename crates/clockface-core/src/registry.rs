//! The clock registry: every clock by name, and its persistence.
//!
//! [`ClockRegistry`] is the sole owner of [`ClockEntity`] values. It is
//! loaded once at startup, mutated only by [`ClockRegistry::create`] and
//! [`ClockRegistry::remove`], and written back to its [`ClockStore`] after
//! every mutation. Re-rendering never touches the store.
//!
//! Both mutations clear the affected clock's voxels before the entry
//! changes, so a replaced or removed clock never leaves hands behind and
//! two clocks with the same name are never rendered at once.

use std::collections::btree_map;

use clockface_types::ClockEntity;
use tracing::info;

use crate::render::{self, RenderOutcome};
use crate::store::{ClockMap, ClockStore, StoreError};
use crate::world::WorldHost;

/// Errors that can occur in registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Loading or saving through the store failed.
    #[error("registry store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// A stored record is keyed under a different name than it carries.
    #[error("stored clock under key {key:?} is named {name:?}")]
    KeyMismatch {
        /// Key in the stored mapping.
        key: String,
        /// Name inside the record.
        name: String,
    },
}

/// What [`ClockRegistry::create`] did with the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// No clock had this name.
    Created,
    /// A clock with this name existed and was cleared and replaced.
    Replaced,
}

/// Name-keyed collection of clocks backed by a [`ClockStore`].
#[derive(Debug)]
pub struct ClockRegistry<S> {
    /// Clocks by name.
    clocks: ClockMap,
    /// Persistence backend.
    store: S,
}

impl<S: ClockStore> ClockRegistry<S> {
    /// Load the registry from `store`. An empty store gives an empty
    /// registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`] if the stored data cannot be read
    /// or parsed, and [`RegistryError::KeyMismatch`] if a record's name
    /// disagrees with its key. A partially valid registry is never
    /// returned.
    pub fn load(store: S) -> Result<Self, RegistryError> {
        let clocks = store.load()?;
        if let Some((key, clock)) = clocks.iter().find(|(key, clock)| key.as_str() != clock.name()) {
            return Err(RegistryError::KeyMismatch {
                key: key.clone(),
                name: clock.name().to_owned(),
            });
        }
        info!(clocks = clocks.len(), "Clock registry loaded");
        Ok(Self { clocks, store })
    }

    /// Insert `clock`, replacing any clock with the same name, and persist.
    ///
    /// A replaced clock has its voxels cleared first. If its region is not
    /// loaded the clear is skipped and its voxels remain in the world.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`] if the registry cannot be saved.
    /// The in-memory registry already holds the new clock in that case.
    pub fn create(
        &mut self,
        clock: ClockEntity,
        host: &mut dyn WorldHost,
    ) -> Result<CreateOutcome, RegistryError> {
        let outcome = match self.clocks.remove(clock.name()) {
            Some(previous) => {
                let cleared = render::clear_clock(&previous, host);
                info!(clock = previous.name(), ?cleared, "Clearing replaced clock");
                CreateOutcome::Replaced
            }
            None => CreateOutcome::Created,
        };

        info!(
            clock = clock.name(),
            world = %clock.world(),
            position = %clock.position(),
            radius = clock.radius(),
            facing = clock.facing().quarter_turns(),
            ?outcome,
            "Clock created"
        );
        self.clocks.insert(clock.name().to_owned(), clock);
        self.save()?;
        Ok(outcome)
    }

    /// Clear and delete the clock called `name`, and persist. Returns
    /// `false` without touching the world or the store if there is no
    /// such clock.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`] if the registry cannot be saved.
    /// The clock is already gone from memory in that case.
    pub fn remove(&mut self, name: &str, host: &mut dyn WorldHost) -> Result<bool, RegistryError> {
        let Some(clock) = self.clocks.remove(name) else {
            return Ok(false);
        };
        let cleared = render::clear_clock(&clock, host);
        if let RenderOutcome::Skipped(reason) = cleared {
            info!(clock = name, ?reason, "Removed clock left in place");
        }
        info!(clock = name, "Clock removed");
        self.save()?;
        Ok(true)
    }

    /// Write the whole registry to the store.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Store`] if the store rejects the write.
    pub fn save(&mut self) -> Result<(), RegistryError> {
        self.store.save(&self.clocks)?;
        Ok(())
    }
}

impl<S> ClockRegistry<S> {
    /// The clock called `name`, if any.
    pub fn get(&self, name: &str) -> Option<&ClockEntity> {
        self.clocks.get(name)
    }

    /// Whether a clock called `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.clocks.contains_key(name)
    }

    /// Clock names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.clocks.keys().map(String::as_str)
    }

    /// All clocks in name order.
    pub fn iter(&self) -> btree_map::Values<'_, String, ClockEntity> {
        self.clocks.values()
    }

    /// Number of clocks.
    pub fn len(&self) -> usize {
        self.clocks.len()
    }

    /// Whether the registry holds no clocks.
    pub fn is_empty(&self) -> bool {
        self.clocks.is_empty()
    }

    /// The persistence backend.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<'a, S> IntoIterator for &'a ClockRegistry<S> {
    type Item = &'a ClockEntity;
    type IntoIter = btree_map::Values<'a, String, ClockEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
