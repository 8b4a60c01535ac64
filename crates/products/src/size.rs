//! Size list canonicalization.
//!
//! A product's `size` attribute is a `/`-delimited list of size codes drawn
//! from a fixed allow-list. Input is tolerant about whitespace and stray
//! delimiters but strict about unknown or repeated codes; output is always the
//! same canonical string for the same set of sizes.

use core::fmt;
use core::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

use catalog_core::ValueObject;

/// Delimiter between size codes, on input and in canonical output.
pub const SIZE_DELIMITER: char = '/';

/// A single allowed size code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Size {
    S,
    M,
    L,
    XL,
    XXL,
}

impl Size {
    /// Every allowed size, in canonical (sorted) order.
    pub const ALL: [Size; 5] = [Size::L, Size::M, Size::S, Size::XL, Size::XXL];

    pub fn as_str(self) -> &'static str {
        match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
            Size::XXL => "XXL",
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a single code is not in the allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown size code '{0}'")]
pub struct UnknownSize(pub String);

impl FromStr for Size {
    type Err = UnknownSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Size::ALL
            .into_iter()
            .find(|size| size.as_str() == s)
            .ok_or_else(|| UnknownSize(s.to_string()))
    }
}

/// Why a raw size string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    /// The string held only delimiters and whitespace.
    #[error("size string '{raw}' is malformed: it contains only delimiters or whitespace")]
    Format { raw: String },

    /// A code outside the allow-list.
    #[error("invalid size '{token}' in '{raw}'; allowed sizes are: {allowed}")]
    InvalidToken {
        raw: String,
        token: String,
        allowed: String,
    },

    /// The same code listed twice.
    #[error("duplicate size '{token}' in '{raw}'")]
    DuplicateToken { raw: String, token: String },
}

/// The allow-list rendered for error messages: `L, M, S, XL, XXL`.
pub fn allowed_sizes() -> String {
    Size::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A non-empty, de-duplicated, sorted list of sizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SizeList(Vec<Size>);

impl ValueObject for SizeList {}

impl SizeList {
    /// Parse a raw delimited string.
    ///
    /// Returns `Ok(None)` for blank input ("no specific size").
    pub fn parse(raw: &str) -> Result<Option<Self>, SizeError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let mut sizes: Vec<Size> = Vec::new();
        let parts = trimmed
            .split(SIZE_DELIMITER)
            .map(str::trim)
            .filter(|part| !part.is_empty());

        for part in parts {
            let size: Size = part.parse().map_err(|_| SizeError::InvalidToken {
                raw: raw.to_string(),
                token: part.to_string(),
                allowed: allowed_sizes(),
            })?;
            if sizes.contains(&size) {
                return Err(SizeError::DuplicateToken {
                    raw: raw.to_string(),
                    token: part.to_string(),
                });
            }
            sizes.push(size);
        }

        if sizes.is_empty() {
            return Err(SizeError::Format {
                raw: raw.to_string(),
            });
        }

        sizes.sort_by_key(|size| size.as_str());
        Ok(Some(Self(sizes)))
    }

}

impl fmt::Display for SizeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, size) in self.0.iter().enumerate() {
            if idx > 0 {
                write!(f, "{SIZE_DELIMITER}")?;
            }
            f.write_str(size.as_str())?;
        }
        Ok(())
    }
}

impl Serialize for SizeList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Canonicalize an optional raw size string.
///
/// `None`, `""` and whitespace-only input all mean "no specific size" and
/// yield `Ok(None)`. Otherwise the result is the sorted, `/`-joined list.
pub fn canonicalize(raw: Option<&str>) -> Result<Option<String>, SizeError> {
    match raw {
        None => Ok(None),
        Some(raw) => Ok(SizeList::parse(raw)?.map(|list| list.to_string())),
    }
}
