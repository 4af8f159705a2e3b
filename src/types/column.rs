//! Schema columns a predicate is evaluated against.

use serde::{Deserialize, Serialize};

use super::DataType;

/// A column declared by a data provider.
///
/// # Example
///
/// ```rust
/// use datagate::{Column, DataType};
///
/// let columns = vec![
///     Column::new("id", DataType::Long),
///     Column::new("name", DataType::String),
/// ];
/// assert_eq!(columns[1].data_type(), DataType::String);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    name: String,
    data_type: DataType,
}

impl Column {
    /// Creates a column declaration.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }

    /// Returns the column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared data type.
    #[inline]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }
}

/// Types that describe their own column list.
///
/// Implemented by `#[derive(Columns)]` when the `derive` feature is enabled.
pub trait Columns {
    /// Returns the columns of this type, in field order.
    fn columns() -> Vec<Column>;
}
