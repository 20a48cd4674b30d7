use serde::Serialize;

use stockpile_core::{DomainError, DomainResult, ItemId};

/// One inventory record.
///
/// Fields are only reachable through accessors; a stored item changes only via
/// [`crate::Store::update`], which re-validates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    id: ItemId,
    name: String,
    quantity: i64,
    price: f64,
    category: String,
}

impl Item {
    /// Build a candidate item. Not validated; see [`Item::validate`].
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        quantity: i64,
        price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            price,
            category: category.into(),
        }
    }

    /// Build an item and validate it in one step.
    pub fn try_new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        quantity: i64,
        price: f64,
        category: impl Into<String>,
    ) -> DomainResult<Self> {
        let item = Self::new(id, name, quantity, price, category);
        item.validate()?;
        Ok(item)
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Check every field constraint.
    ///
    /// Fail-fast: fields are checked in the order id, name, quantity, price,
    /// category, and the first violation is returned.
    pub fn validate(&self) -> DomainResult<()> {
        if !self.id.is_positive() {
            return Err(DomainError::validation("id", "must be a positive integer"));
        }
        if self.name.is_empty() {
            return Err(DomainError::validation("name", "must be non-empty text"));
        }
        if self.quantity < 0 {
            return Err(DomainError::validation(
                "quantity",
                "must be a non-negative integer",
            ));
        }
        // NaN fails the comparison, so only finite non-negative prices pass.
        if !(self.price.is_finite() && self.price >= 0.0) {
            return Err(DomainError::validation(
                "price",
                "must be a non-negative number",
            ));
        }
        if self.category.is_empty() {
            return Err(DomainError::validation(
                "category",
                "must be non-empty text",
            ));
        }
        Ok(())
    }

    /// Copy of this item with `changes` applied. The id is never changed.
    pub(crate) fn with_changes(&self, changes: &ItemChanges) -> Self {
        let mut next = self.clone();
        if let Some(name) = &changes.name {
            next.name = name.clone();
        }
        if let Some(quantity) = changes.quantity {
            next.quantity = quantity;
        }
        if let Some(price) = changes.price {
            next.price = price;
        }
        if let Some(category) = &changes.category {
            next.category = category.clone();
        }
        next
    }
}

/// Partial update for an [`Item`]: each present field replaces the stored
/// value, absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemChanges {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

impl ItemChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
            && self.category.is_none()
    }

    /// Record a change given as a field name and its text value.
    ///
    /// Unrecognized field names (including `id`, which is immutable) are
    /// ignored and `Ok(false)` is returned. A value that does not parse for a
    /// numeric field is a validation error for that field.
    pub fn set_field(&mut self, key: &str, raw: &str) -> DomainResult<bool> {
        match key {
            "name" => self.name = Some(raw.to_string()),
            "category" => self.category = Some(raw.to_string()),
            "quantity" => {
                let quantity = raw
                    .trim()
                    .parse()
                    .map_err(|_| DomainError::validation("quantity", "must be an integer"))?;
                self.quantity = Some(quantity);
            }
            "price" => {
                let price = raw
                    .trim()
                    .parse()
                    .map_err(|_| DomainError::validation("price", "must be a number"))?;
                self.price = Some(price);
            }
            other => {
                tracing::debug!(field = other, "ignoring unrecognized update field");
                return Ok(false);
            }
        }
        Ok(true)
    }
}
