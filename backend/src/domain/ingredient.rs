//! Ingredient catalog reference data.
//!
//! Ingredients are identified by their `(name, measurement_unit)` pair; the
//! surrogate [`IngredientId`] is what requests and recipe lines refer to.
//! Catalog entries are loaded in bulk and read-only to the rest of the system.

use std::fmt;

use uuid::Uuid;

/// Surrogate identifier of a catalog ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IngredientId(Uuid);

impl IngredientId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for IngredientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// Validation failures for [`IngredientSpec`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngredientValidationError {
    #[error("ingredient name must not be empty")]
    EmptyName,
    #[error("measurement unit must not be empty")]
    EmptyUnit,
}

/// A validated `(name, measurement_unit)` pair awaiting import.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IngredientSpec {
    name: String,
    measurement_unit: String,
}

impl IngredientSpec {
    /// Trim and validate both halves of the identity pair.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::IngredientSpec;
    ///
    /// let spec = IngredientSpec::new("  flour ", "g").expect("valid");
    /// assert_eq!(spec.name(), "flour");
    /// assert!(IngredientSpec::new("salt", " ").is_err());
    /// ```
    pub fn new(
        name: impl AsRef<str>,
        measurement_unit: impl AsRef<str>,
    ) -> Result<Self, IngredientValidationError> {
        let name = name.as_ref().trim();
        let measurement_unit = measurement_unit.as_ref().trim();
        if name.is_empty() {
            return Err(IngredientValidationError::EmptyName);
        }
        if measurement_unit.is_empty() {
            return Err(IngredientValidationError::EmptyUnit);
        }
        Ok(Self {
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn measurement_unit(&self) -> &str {
        &self.measurement_unit
    }
}

/// Outcome of a bulk import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Pairs that were not yet in the catalog.
    pub inserted: usize,
    /// Pairs that already existed, including duplicates within the batch.
    pub skipped: usize,
}
