//! Structural validation of recipe drafts.
//!
//! Every problem found in a draft is collected into a
//! [`RecipeValidationReport`] so clients see all field errors at once.
//! Catalog membership of ingredients is checked by the recipe service, which
//! appends [`RecipeValidationError::UnknownIngredient`] entries to the same
//! report before it is turned into an [`Error`].

use std::collections::HashSet;

use serde_json::{Map, Value, json};

use super::{Amount, CookingTime, IngredientLine, RECIPE_NAME_MAX};
use crate::domain::{Error, IngredientId};

/// Ingredient line as submitted, before amount validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawIngredientLine {
    pub ingredient_id: IngredientId,
    pub amount: i64,
}

/// Recipe fields as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: Option<String>,
    pub text: Option<String>,
    /// Encoded image payload, stored through the image port once valid.
    pub image: Option<String>,
    pub cooking_time: Option<i64>,
    pub ingredients: Option<Vec<RawIngredientLine>>,
}

/// Whether absent draft fields are errors or mean "unchanged".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftMode {
    Create,
    Replace,
}

/// Recipe fields that can carry validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeField {
    Ingredients,
    CookingTime,
    Name,
    Text,
    Image,
}

impl RecipeField {
    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ingredients => "ingredients",
            Self::CookingTime => "cookingTime",
            Self::Name => "name",
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    #[error("recipe must contain at least one ingredient")]
    EmptyIngredients,
    #[error("ingredient {ingredient_id} is listed more than once")]
    DuplicateIngredient { ingredient_id: IngredientId },
    #[error("amount of ingredient {ingredient_id} must be at least 1, got {amount}")]
    InvalidAmount {
        ingredient_id: IngredientId,
        amount: i64,
    },
    #[error("ingredient {ingredient_id} does not exist")]
    UnknownIngredient { ingredient_id: IngredientId },
    #[error("cooking time must be a whole number of minutes, at least 1")]
    InvalidCookingTime,
    #[error("recipe name must not be empty")]
    EmptyName,
    #[error("recipe name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("recipe text must not be empty")]
    EmptyText,
    #[error("recipe image is required")]
    MissingImage,
    #[error("recipe image could not be decoded: {reason}")]
    InvalidImage { reason: String },
}

impl RecipeValidationError {
    /// Field the error is reported against.
    pub fn field(&self) -> RecipeField {
        match self {
            Self::EmptyIngredients
            | Self::DuplicateIngredient { .. }
            | Self::InvalidAmount { .. }
            | Self::UnknownIngredient { .. } => RecipeField::Ingredients,
            Self::InvalidCookingTime => RecipeField::CookingTime,
            Self::EmptyName | Self::NameTooLong { .. } => RecipeField::Name,
            Self::EmptyText => RecipeField::Text,
            Self::MissingImage | Self::InvalidImage { .. } => RecipeField::Image,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyIngredients => "empty_ingredients",
            Self::DuplicateIngredient { .. } => "duplicate_ingredient",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::UnknownIngredient { .. } => "unknown_ingredient",
            Self::InvalidCookingTime => "invalid_cooking_time",
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
            Self::EmptyText => "empty_text",
            Self::MissingImage => "missing_image",
            Self::InvalidImage { .. } => "invalid_image",
        }
    }

    fn ingredient_id(&self) -> Option<IngredientId> {
        match self {
            Self::DuplicateIngredient { ingredient_id }
            | Self::InvalidAmount { ingredient_id, .. }
            | Self::UnknownIngredient { ingredient_id } => Some(*ingredient_id),
            _ => None,
        }
    }

    fn to_detail(&self) -> Value {
        let mut entry = Map::new();
        entry.insert("code".to_owned(), json!(self.code()));
        entry.insert("message".to_owned(), json!(self.to_string()));
        if let Some(id) = self.ingredient_id() {
            entry.insert("ingredientId".to_owned(), json!(id.to_string()));
        }
        Value::Object(entry)
    }
}

/// Ordered collection of validation failures for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeValidationReport {
    errors: Vec<RecipeValidationError>,
}

impl RecipeValidationReport {
    pub fn push(&mut self, error: RecipeValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[RecipeValidationError] {
        &self.errors
    }

    /// Fail with the collected errors, if any.
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into())
        }
    }
}

impl From<RecipeValidationError> for RecipeValidationReport {
    fn from(error: RecipeValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl From<RecipeValidationReport> for Error {
    fn from(report: RecipeValidationReport) -> Self {
        let mut fields = Map::new();
        for error in &report.errors {
            let slot = fields
                .entry(error.field().as_str())
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(entries) = slot {
                entries.push(error.to_detail());
            }
        }
        Error::invalid_request("recipe validation failed").with_details(json!({
            "code": "validation_failed",
            "fields": fields,
        }))
    }
}

/// Draft fields that passed structural validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedDraft {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<CookingTime>,
    pub lines: Option<Vec<IngredientLine>>,
}

/// Validate a draft, returning the usable fields alongside every problem.
///
/// Callers must treat the draft as rejected unless the report is empty.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{DraftMode, RecipeDraft, validate_draft};
///
/// let (_, report) = validate_draft(RecipeDraft::default(), DraftMode::Create);
/// assert_eq!(report.errors().len(), 5);
///
/// let (_, report) = validate_draft(RecipeDraft::default(), DraftMode::Replace);
/// assert!(report.is_empty());
/// ```
pub fn validate_draft(
    draft: RecipeDraft,
    mode: DraftMode,
) -> (ValidatedDraft, RecipeValidationReport) {
    let mut report = RecipeValidationReport::default();
    let required = mode == DraftMode::Create;

    let lines = match draft.ingredients {
        Some(raw) => validate_lines(&raw, &mut report),
        None if required => {
            report.push(RecipeValidationError::EmptyIngredients);
            None
        }
        None => None,
    };

    let cooking_time = match draft.cooking_time {
        Some(minutes) => {
            let parsed = CookingTime::new(minutes);
            if parsed.is_none() {
                report.push(RecipeValidationError::InvalidCookingTime);
            }
            parsed
        }
        None if required => {
            report.push(RecipeValidationError::InvalidCookingTime);
            None
        }
        None => None,
    };

    let name = validate_text_field(draft.name, required, &mut report, |name| {
        if name.is_empty() {
            Some(RecipeValidationError::EmptyName)
        } else if name.chars().count() > RECIPE_NAME_MAX {
            Some(RecipeValidationError::NameTooLong {
                max: RECIPE_NAME_MAX,
            })
        } else {
            None
        }
    });

    let text = validate_text_field(draft.text, required, &mut report, |text| {
        text.is_empty().then_some(RecipeValidationError::EmptyText)
    });

    let image = validate_text_field(draft.image, required, &mut report, |image| {
        image.is_empty().then_some(RecipeValidationError::MissingImage)
    });

    (
        ValidatedDraft {
            name,
            text,
            image,
            cooking_time,
            lines,
        },
        report,
    )
}

fn validate_text_field(
    value: Option<String>,
    required: bool,
    report: &mut RecipeValidationReport,
    check: impl Fn(&str) -> Option<RecipeValidationError>,
) -> Option<String> {
    match value {
        Some(raw) => {
            let trimmed = raw.trim();
            match check(trimmed) {
                Some(error) => {
                    report.push(error);
                    None
                }
                None => Some(trimmed.to_owned()),
            }
        }
        None if required => {
            if let Some(error) = check("") {
                report.push(error);
            }
            None
        }
        None => None,
    }
}

fn validate_lines(
    raw: &[RawIngredientLine],
    report: &mut RecipeValidationReport,
) -> Option<Vec<IngredientLine>> {
    if raw.is_empty() {
        report.push(RecipeValidationError::EmptyIngredients);
        return None;
    }

    let mut seen = HashSet::with_capacity(raw.len());
    let mut reported_duplicates = HashSet::new();
    let mut lines = Vec::with_capacity(raw.len());
    let mut valid = true;

    for line in raw {
        if !seen.insert(line.ingredient_id) {
            if reported_duplicates.insert(line.ingredient_id) {
                report.push(RecipeValidationError::DuplicateIngredient {
                    ingredient_id: line.ingredient_id,
                });
            }
            valid = false;
            continue;
        }
        match Amount::new(line.amount) {
            Some(amount) => lines.push(IngredientLine {
                ingredient_id: line.ingredient_id,
                amount,
            }),
            None => {
                report.push(RecipeValidationError::InvalidAmount {
                    ingredient_id: line.ingredient_id,
                    amount: line.amount,
                });
                valid = false;
            }
        }
    }

    valid.then_some(lines)
}
