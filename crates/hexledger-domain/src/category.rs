//! Domain types representing the canonical record categories.

use std::{fmt, str::FromStr};

use serde::{de::Deserializer, Deserialize, Serialize, Serializer};

/// Fixed set of categories a financial record can belong to.
///
/// Parsing is case-insensitive; the canonical written form is lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Asset,
    Liability,
    Income,
    Expense,
    Equity,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Asset,
        Category::Liability,
        Category::Income,
        Category::Expense,
        Category::Equity,
    ];

    /// Canonical lowercase identifier used on disk and in payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Asset => "asset",
            Category::Liability => "liability",
            Category::Income => "income",
            Category::Expense => "expense",
            Category::Equity => "equity",
        }
    }

    /// Capitalised label for tables and charts.
    pub fn label(self) -> &'static str {
        match self {
            Category::Asset => "Asset",
            Category::Liability => "Liability",
            Category::Income => "Income",
            Category::Expense => "Expense",
            Category::Equity => "Equity",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asset" => Ok(Category::Asset),
            "liability" => Ok(Category::Liability),
            "income" => Ok(Category::Income),
            "expense" => Ok(Category::Expense),
            "equity" => Ok(Category::Equity),
            _ => Err(CategoryError {
                value: value.to_string(),
            }),
        }
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Raised when a string does not name one of the canonical categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryError {
    pub value: String,
}

impl fmt::Display for CategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown category `{}`; expected one of asset, liability, income, expense, equity",
            self.value.trim()
        )
    }
}

impl std::error::Error for CategoryError {}
