use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use stockpile_core::{DomainError, DomainResult, ItemId};

use crate::item::{Item, ItemChanges};

/// Id-keyed collection of validated items.
///
/// The store is the only owner of its items: lookups hand out shared
/// references, and every change goes through [`Store::add`],
/// [`Store::remove`] or [`Store::update`]. Iteration order is ascending id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    items: BTreeMap<ItemId, Item>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from previously persisted items without re-validating.
    ///
    /// Later items replace earlier ones with the same id.
    pub(crate) fn from_trusted(items: impl IntoIterator<Item = Item>) -> Self {
        let mut store = Self::new();
        for item in items {
            store.insert_trusted(item);
        }
        store
    }

    pub(crate) fn insert_trusted(&mut self, item: Item) {
        if let Some(previous) = self.items.insert(item.id(), item) {
            tracing::warn!(id = %previous.id(), "duplicate id in loaded data; keeping the later row");
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Insert a new item.
    ///
    /// - Fails with [`DomainError::DuplicateKey`] if the id is taken
    /// - Fails with [`DomainError::Validation`] if the item is invalid
    ///
    /// The store is unchanged on failure.
    pub fn add(&mut self, item: Item) -> DomainResult<&Item> {
        match self.items.entry(item.id()) {
            Entry::Occupied(_) => Err(DomainError::DuplicateKey(item.id())),
            Entry::Vacant(slot) => {
                item.validate()?;
                tracing::info!(id = %item.id(), name = item.name(), "added item");
                Ok(slot.insert(item))
            }
        }
    }

    /// Delete the item with `id` and return it.
    pub fn remove(&mut self, id: ItemId) -> DomainResult<Item> {
        let removed = self.items.remove(&id).ok_or(DomainError::NotFound(id))?;
        tracing::info!(id = %id, "removed item");
        Ok(removed)
    }

    /// Apply a partial change set to the item with `id`.
    ///
    /// Changes are applied to a copy which is validated before it replaces
    /// the stored item, so a rejected update leaves the item exactly as it was.
    pub fn update(&mut self, id: ItemId, changes: &ItemChanges) -> DomainResult<&Item> {
        let current = self.items.get_mut(&id).ok_or(DomainError::NotFound(id))?;
        let next = current.with_changes(changes);
        next.validate()?;
        *current = next;
        tracing::info!(id = %id, "updated item");
        Ok(current)
    }

    /// Look up an item. A missing id is `None`, not an error.
    pub fn find(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// All `(id, item)` pairs in ascending id order.
    pub fn list_all(&self) -> impl ExactSizeIterator<Item = (ItemId, &Item)> + '_ {
        self.items.iter().map(|(id, item)| (*id, item))
    }
}
