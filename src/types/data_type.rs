//! Data types assignable to predicate nodes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The closed set of data types a column or predicate node can carry.
///
/// # Example
///
/// ```rust
/// use datagate::DataType;
///
/// assert!(DataType::Long.is_compatible_with(DataType::Double));
/// assert!(!DataType::String.is_compatible_with(DataType::Boolean));
/// assert_eq!("DATE_TIME".parse::<DataType>().unwrap(), DataType::DateTime);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    /// Text.
    String,
    /// 64-bit signed integer.
    Long,
    /// 64-bit floating point.
    Double,
    /// True or false.
    Boolean,
    /// Calendar date without time.
    Date,
    /// Time of day without date.
    Time,
    /// Date and time.
    DateTime,
    /// A list of strings.
    ListOfStrings,
}

impl DataType {
    /// All data types, in declaration order.
    pub const ALL: [DataType; 8] = [
        DataType::String,
        DataType::Long,
        DataType::Double,
        DataType::Boolean,
        DataType::Date,
        DataType::Time,
        DataType::DateTime,
        DataType::ListOfStrings,
    ];

    /// Returns `true` for LONG and DOUBLE.
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Long | DataType::Double)
    }

    /// Returns `true` if values of the two types may be compared.
    ///
    /// Equal types are compatible, and LONG and DOUBLE coerce into each
    /// other. Every other pairing is illegal.
    #[inline]
    pub fn is_compatible_with(&self, other: DataType) -> bool {
        *self == other || (self.is_numeric() && other.is_numeric())
    }

    /// Returns the canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::String => "STRING",
            DataType::Long => "LONG",
            DataType::Double => "DOUBLE",
            DataType::Boolean => "BOOLEAN",
            DataType::Date => "DATE",
            DataType::Time => "TIME",
            DataType::DateTime => "DATE_TIME",
            DataType::ListOfStrings => "LIST_OF_STRINGS",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::configuration(format!("unknown data type '{}'", s)))
    }
}
