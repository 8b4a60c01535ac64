use core::fmt;

use serde::Serialize;

use catalog_core::{Entity, ValueObject};

use crate::size::SizeList;

/// Maximum length (in characters) of a product code.
pub const CODE_MAX_LEN: usize = 50;
/// Maximum length of a product name.
pub const NAME_MAX_LEN: usize = 255;
/// Maximum length of a category.
pub const CATEGORY_MAX_LEN: usize = 100;
/// Maximum length of a color.
pub const COLOR_MAX_LEN: usize = 255;
/// Exclusive upper bound of a unit price (the store keeps `NUMERIC(10,2)`).
pub const UNIT_PRICE_LIMIT: f64 = 100_000_000.0;

/// Product identifier: 1 to 50 characters, unique across the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ProductCode(String);

impl ValueObject for ProductCode {}

impl ProductCode {
    /// Validate and wrap a raw code.
    pub fn parse(raw: impl Into<String>) -> Result<Self, String> {
        let raw = raw.into();
        let len = raw.chars().count();
        if len == 0 {
            return Err("must not be empty".to_string());
        }
        if len > CODE_MAX_LEN {
            return Err(format!("must be at most {CODE_MAX_LEN} characters (got {len})"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A persisted product.
///
/// Instances only come out of the validation layer (or a validated restore
/// from storage), so every record upholds the catalog invariants:
/// `unit_price > 0`, `inventory >= 0`, bounded string lengths and a
/// canonical size list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub(crate) name: String,
    pub(crate) code: ProductCode,
    pub(crate) category: Option<String>,
    pub(crate) unit_price: f64,
    pub(crate) inventory: i32,
    pub(crate) size: Option<SizeList>,
    pub(crate) color: Option<String>,
}

impl ProductRecord {
    pub fn code(&self) -> &ProductCode {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn inventory(&self) -> i32 {
        self.inventory
    }

    pub fn size(&self) -> Option<&SizeList> {
        self.size.as_ref()
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Merge a changeset into this record, producing the updated record.
    ///
    /// Absent fields keep their current value. The receiver is untouched.
    pub fn apply(&self, changes: &ProductChanges) -> ProductRecord {
        ProductRecord {
            name: changes.name.clone().unwrap_or_else(|| self.name.clone()),
            code: changes.code.clone().unwrap_or_else(|| self.code.clone()),
            category: changes
                .category
                .clone()
                .unwrap_or_else(|| self.category.clone()),
            unit_price: changes.unit_price.unwrap_or(self.unit_price),
            inventory: changes.inventory.unwrap_or(self.inventory),
            size: changes.size.clone().unwrap_or_else(|| self.size.clone()),
            color: changes.color.clone().unwrap_or_else(|| self.color.clone()),
        }
    }
}

impl Entity for ProductRecord {
    type Id = ProductCode;

    fn id(&self) -> &Self::Id {
        &self.code
    }
}

/// Validated partial update.
///
/// Each field is either absent (`None`: keep the current value) or present.
/// For nullable attributes the inner `Option` distinguishes "set" from "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductChanges {
    pub(crate) name: Option<String>,
    pub(crate) code: Option<ProductCode>,
    pub(crate) category: Option<Option<String>>,
    pub(crate) unit_price: Option<f64>,
    pub(crate) inventory: Option<i32>,
    pub(crate) size: Option<Option<SizeList>>,
    pub(crate) color: Option<Option<String>>,
}

impl ProductChanges {
    /// The requested new code, if the update renames the product.
    pub fn code(&self) -> Option<&ProductCode> {
        self.code.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Names of the fields this changeset touches (for logging).
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.code.is_some() {
            fields.push("code");
        }
        if self.category.is_some() {
            fields.push("category");
        }
        if self.unit_price.is_some() {
            fields.push("unit_price");
        }
        if self.inventory.is_some() {
            fields.push("inventory");
        }
        if self.size.is_some() {
            fields.push("size");
        }
        if self.color.is_some() {
            fields.push("color");
        }
        fields
    }
}
