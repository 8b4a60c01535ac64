//! Payload validation.
//!
//! Two payload shapes feed one set of per-field checks:
//! - [`CreateProductInput`]: `name`, `code`, `unit_price` and `inventory` are
//!   required; omitted `size`/`color` fall back to the catalog defaults.
//! - [`UpdateProductInput`]: every field is optional and only supplied
//!   fields are checked, producing a [`ProductChanges`] changeset.
//!
//! All field errors are collected before returning, so a client sees every
//! problem with its payload at once. Unknown JSON fields are ignored.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::product::{
    CATEGORY_MAX_LEN, COLOR_MAX_LEN, NAME_MAX_LEN, ProductChanges, ProductCode, ProductRecord,
    UNIT_PRICE_LIMIT,
};
use crate::size::SizeList;

/// Size assigned on create when the payload omits the field.
pub const DEFAULT_SIZE: &str = "S";
/// Color assigned on create when the payload omits the field.
pub const DEFAULT_COLOR: &str = "red";

/// A payload field as sent by the client: omitted, explicit `null`, or a value.
///
/// Use with `#[serde(default)]` so an omitted key becomes [`Patch::Absent`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    fn into_option(self) -> Option<T> {
        match self {
            Patch::Value(v) => Some(v),
            Patch::Absent | Patch::Null => None,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

/// Create payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProductInput {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub code: Patch<String>,
    #[serde(default)]
    pub category: Patch<String>,
    #[serde(default)]
    pub unit_price: Patch<f64>,
    #[serde(default)]
    pub inventory: Patch<i64>,
    #[serde(default)]
    pub size: Patch<String>,
    #[serde(default)]
    pub color: Patch<String>,
}

/// Partial update payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub code: Patch<String>,
    #[serde(default)]
    pub category: Patch<String>,
    #[serde(default)]
    pub unit_price: Patch<f64>,
    #[serde(default)]
    pub inventory: Patch<i64>,
    #[serde(default)]
    pub size: Patch<String>,
    #[serde(default)]
    pub color: Patch<String>,
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field error found in one payload (never empty when returned as `Err`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{}", join_field_errors(.0))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First error reported for `field`, if any.
    pub fn field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record the outcome of a check, keeping the value on success.
    fn check<T>(&mut self, field: &'static str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(message) => {
                self.push(field, message);
                None
            }
        }
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

// -------------------------
// Per-field checks
// -------------------------

fn check_len(value: String, min: usize, max: usize) -> Result<String, String> {
    let len = value.chars().count();
    if len < min {
        return Err(format!("must be at least {min} character(s)"));
    }
    if len > max {
        return Err(format!("must be at most {max} characters (got {len})"));
    }
    Ok(value)
}

fn check_name(value: String) -> Result<String, String> {
    check_len(value, 1, NAME_MAX_LEN)
}

fn check_category(value: String) -> Result<String, String> {
    check_len(value, 0, CATEGORY_MAX_LEN)
}

fn check_color(value: String) -> Result<String, String> {
    check_len(value, 0, COLOR_MAX_LEN)
}

/// Prices are kept in cents (`NUMERIC(10,2)`); bounds apply to the rounded value.
fn check_unit_price(value: f64) -> Result<f64, String> {
    if !value.is_finite() {
        return Err("must be a finite number".to_string());
    }
    if value <= 0.0 {
        return Err("must be greater than 0".to_string());
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded <= 0.0 {
        return Err("must be at least 0.01".to_string());
    }
    if rounded >= UNIT_PRICE_LIMIT {
        return Err(format!("must be less than {UNIT_PRICE_LIMIT}"));
    }
    Ok(rounded)
}

fn check_inventory(value: i64) -> Result<i32, String> {
    if value < 0 {
        return Err("must be greater than or equal to 0".to_string());
    }
    i32::try_from(value).map_err(|_| format!("must be at most {}", i32::MAX))
}

fn check_size(value: Option<&str>) -> Result<Option<SizeList>, String> {
    match value {
        None => Ok(None),
        Some(raw) => SizeList::parse(raw).map_err(|e| e.to_string()),
    }
}

fn required<T>(errors: &mut ValidationErrors, field: &'static str, value: Patch<T>) -> Option<T> {
    match value {
        Patch::Value(v) => Some(v),
        Patch::Absent | Patch::Null => {
            errors.push(field, "field required");
            None
        }
    }
}

/// Nullable attribute on update: absent → untouched, null → cleared.
fn nullable<T, U>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Patch<T>,
    check: impl FnOnce(T) -> Result<U, String>,
) -> Option<Option<U>> {
    match value {
        Patch::Absent => None,
        Patch::Null => Some(None),
        Patch::Value(v) => errors.check(field, check(v)).map(Some),
    }
}

/// Non-nullable attribute on update: absent → untouched, null → error.
fn non_null<T, U>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Patch<T>,
    check: impl FnOnce(T) -> Result<U, String>,
) -> Option<U> {
    match value {
        Patch::Absent => None,
        Patch::Null => {
            errors.push(field, "may not be null");
            None
        }
        Patch::Value(v) => errors.check(field, check(v)),
    }
}

// -------------------------
// Payload adapters
// -------------------------

/// Validate a create payload into a new record.
pub fn validate_create(input: CreateProductInput) -> Result<ProductRecord, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = required(&mut errors, "name", input.name)
        .and_then(|v| errors.check("name", check_name(v)));
    let code = required(&mut errors, "code", input.code)
        .and_then(|v| errors.check("code", ProductCode::parse(v)));
    let unit_price = required(&mut errors, "unit_price", input.unit_price)
        .and_then(|v| errors.check("unit_price", check_unit_price(v)));
    let inventory = required(&mut errors, "inventory", input.inventory)
        .and_then(|v| errors.check("inventory", check_inventory(v)));

    let category = match input.category.into_option() {
        None => Some(None),
        Some(v) => errors.check("category", check_category(v)).map(Some),
    };
    let size = match input.size {
        Patch::Absent => errors.check("size", check_size(Some(DEFAULT_SIZE))),
        Patch::Null => Some(None),
        Patch::Value(raw) => errors.check("size", check_size(Some(&raw))),
    };
    let color = match input.color {
        Patch::Absent => Some(Some(DEFAULT_COLOR.to_string())),
        Patch::Null => Some(None),
        Patch::Value(v) => errors.check("color", check_color(v)).map(Some),
    };

    if !errors.is_empty() {
        return Err(errors);
    }
    match (name, code, category, unit_price, inventory, size, color) {
        (
            Some(name),
            Some(code),
            Some(category),
            Some(unit_price),
            Some(inventory),
            Some(size),
            Some(color),
        ) => Ok(ProductRecord {
            name,
            code,
            category,
            unit_price,
            inventory,
            size,
            color,
        }),
        // Every `None` above recorded an error.
        _ => Err(errors),
    }
}

/// Validate a partial update payload into a changeset.
pub fn validate_update(input: UpdateProductInput) -> Result<ProductChanges, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let changes = ProductChanges {
        name: non_null(&mut errors, "name", input.name, check_name),
        code: non_null(&mut errors, "code", input.code, ProductCode::parse),
        category: nullable(&mut errors, "category", input.category, check_category),
        unit_price: non_null(&mut errors, "unit_price", input.unit_price, check_unit_price),
        inventory: non_null(&mut errors, "inventory", input.inventory, check_inventory),
        size: match input.size {
            Patch::Absent => None,
            Patch::Null => Some(None),
            Patch::Value(raw) => errors.check("size", check_size(Some(&raw))),
        },
        color: nullable(&mut errors, "color", input.color, check_color),
    };

    errors.into_result()?;
    Ok(changes)
}

/// Stored column values, as read back from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProduct {
    pub name: String,
    pub code: String,
    pub category: Option<String>,
    pub unit_price: f64,
    pub inventory: i32,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Rebuild a record from stored values, re-checking every invariant.
///
/// Unlike create, no defaults are applied: a stored `NULL` stays absent.
pub fn restore(stored: StoredProduct) -> Result<ProductRecord, ValidationErrors> {
    let input = CreateProductInput {
        name: Patch::Value(stored.name),
        code: Patch::Value(stored.code),
        category: stored.category.into(),
        unit_price: Patch::Value(stored.unit_price),
        inventory: Patch::Value(i64::from(stored.inventory)),
        size: stored.size.into(),
        color: stored.color.into(),
    };
    validate_create(input)
}

impl From<&ProductRecord> for StoredProduct {
    fn from(record: &ProductRecord) -> Self {
        Self {
            name: record.name.clone(),
            code: record.code.as_str().to_string(),
            category: record.category.clone(),
            unit_price: record.unit_price,
            inventory: record.inventory,
            size: record.size.as_ref().map(|s| s.to_string()),
            color: record.color.clone(),
        }
    }
}
