//! The predicate AST submitted by clients.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A literal carried by a [`Value`] node.
///
/// Serialized as a plain JSON scalar. Integers deserialize as `Long`,
/// numbers with a fractional part as `Double`.
///
/// Doubles compare and hash by bit pattern so literals can key a
/// [`Context`](crate::Context).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// Boolean literal.
    Boolean(bool),

    /// Integer literal (64-bit signed).
    Long(i64),

    /// Floating-point literal (64-bit).
    Double(f64),

    /// String literal.
    String(String),
}

impl PartialEq for Literal {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Literal::Boolean(a), Literal::Boolean(b)) => a == b,
            (Literal::Long(a), Literal::Long(b)) => a == b,
            (Literal::Double(a), Literal::Double(b)) => a.to_bits() == b.to_bits(),
            (Literal::String(a), Literal::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Literal {}

impl Hash for Literal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Literal::Boolean(b) => b.hash(state),
            Literal::Long(i) => i.hash(state),
            Literal::Double(f) => f.to_bits().hash(state),
            Literal::String(s) => s.hash(state),
        }
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Boolean(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Long(value as i64)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Long(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Double(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_owned())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

/// A reference to a column of the data provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnName {
    name: String,
}

impl ColumnName {
    /// Creates a column reference.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Returns the referenced column name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&str> for ColumnName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ColumnName {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A literal value appearing in a predicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Value {
    value: Literal,
}

impl Value {
    /// Wraps a literal.
    pub fn new(value: impl Into<Literal>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the wrapped literal.
    #[inline]
    pub fn literal(&self) -> &Literal {
        &self.value
    }
}

macro_rules! value_from {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Self::new(value)
                }
            }
        )*
    };
}

value_from!(bool, i32, i64, f64, &str, String, Literal);

/// Any node of a predicate expression.
///
/// The enum is closed: the [walker](crate::query::walk) and the type
/// inference passes match on it exhaustively. Equality and hashing are
/// structural, so two identical sub-expressions are the same
/// [`Context`](crate::Context) entry.
///
/// ## Wire format
///
/// ```json
/// {"type": "and", "operands": [
///   {"type": "equal", "left": {"type": "columnName", "name": "age"},
///                     "right": {"type": "value", "value": 42}},
///   {"type": "contains", "column": {"name": "city"},
///                        "value": {"value": "ber"}, "caseSensitive": false}
/// ]}
/// ```
///
/// ## Example
///
/// ```rust
/// use datagate::RequestElement as E;
///
/// let predicate = E::and([
///     E::equal(E::column("age"), E::value(42)),
///     E::contains("city", "ber", false),
/// ]);
/// assert!(predicate.is_predicate());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RequestElement {
    /// A column reference.
    ColumnName(ColumnName),

    /// A literal value.
    Value(Value),

    /// True when every operand is true.
    And {
        /// Operands, evaluated in order.
        operands: Vec<RequestElement>,
    },

    /// True when any operand is true.
    Or {
        /// Operands, evaluated in order.
        operands: Vec<RequestElement>,
    },

    /// `left = right`
    Equal {
        /// Left operand.
        left: Box<RequestElement>,
        /// Right operand.
        right: Box<RequestElement>,
    },

    /// `left <> right`
    NotEqual {
        /// Left operand.
        left: Box<RequestElement>,
        /// Right operand.
        right: Box<RequestElement>,
    },

    /// `left > right`
    GreaterThan {
        /// Left operand.
        left: Box<RequestElement>,
        /// Right operand.
        right: Box<RequestElement>,
    },

    /// `left >= right`
    GreaterThanOrEqual {
        /// Left operand.
        left: Box<RequestElement>,
        /// Right operand.
        right: Box<RequestElement>,
    },

    /// `left < right`
    LowerThan {
        /// Left operand.
        left: Box<RequestElement>,
        /// Right operand.
        right: Box<RequestElement>,
    },

    /// `left <= right`
    LowerThanOrEqual {
        /// Left operand.
        left: Box<RequestElement>,
        /// Right operand.
        right: Box<RequestElement>,
    },

    /// `column IN (values...)`
    In {
        /// Tested column.
        column: ColumnName,
        /// Accepted values.
        values: Vec<Value>,
    },

    /// `column NOT IN (values...)`
    NotIn {
        /// Tested column.
        column: ColumnName,
        /// Rejected values.
        values: Vec<Value>,
    },

    /// Substring match on a string column.
    Contains {
        /// Tested column.
        column: ColumnName,
        /// Searched substring.
        value: Value,
        /// Whether letter case must match.
        case_sensitive: bool,
    },

    /// Prefix match on a string column.
    StartsWith {
        /// Tested column.
        column: ColumnName,
        /// Expected prefix.
        value: Value,
        /// Whether letter case must match.
        case_sensitive: bool,
    },

    /// Suffix match on a string column.
    EndsWith {
        /// Tested column.
        column: ColumnName,
        /// Expected suffix.
        value: Value,
        /// Whether letter case must match.
        case_sensitive: bool,
    },
}

impl RequestElement {
    /// Creates a column reference node.
    pub fn column(name: impl Into<ColumnName>) -> Self {
        RequestElement::ColumnName(name.into())
    }

    /// Creates a literal value node.
    pub fn value(value: impl Into<Literal>) -> Self {
        RequestElement::Value(Value::new(value))
    }

    /// Creates an `And` node.
    pub fn and(operands: impl IntoIterator<Item = RequestElement>) -> Self {
        RequestElement::And {
            operands: operands.into_iter().collect(),
        }
    }

    /// Creates an `Or` node.
    pub fn or(operands: impl IntoIterator<Item = RequestElement>) -> Self {
        RequestElement::Or {
            operands: operands.into_iter().collect(),
        }
    }

    /// Creates an `Equal` node.
    pub fn equal(left: RequestElement, right: RequestElement) -> Self {
        RequestElement::Equal {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a `NotEqual` node.
    pub fn not_equal(left: RequestElement, right: RequestElement) -> Self {
        RequestElement::NotEqual {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a `GreaterThan` node.
    pub fn greater_than(left: RequestElement, right: RequestElement) -> Self {
        RequestElement::GreaterThan {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a `GreaterThanOrEqual` node.
    pub fn greater_than_or_equal(left: RequestElement, right: RequestElement) -> Self {
        RequestElement::GreaterThanOrEqual {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a `LowerThan` node.
    pub fn lower_than(left: RequestElement, right: RequestElement) -> Self {
        RequestElement::LowerThan {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a `LowerThanOrEqual` node.
    pub fn lower_than_or_equal(left: RequestElement, right: RequestElement) -> Self {
        RequestElement::LowerThanOrEqual {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates an `In` node.
    pub fn is_in<V: Into<Value>>(
        column: impl Into<ColumnName>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        RequestElement::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a `NotIn` node.
    pub fn not_in<V: Into<Value>>(
        column: impl Into<ColumnName>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        RequestElement::NotIn {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a `Contains` node.
    pub fn contains(
        column: impl Into<ColumnName>,
        value: impl Into<Value>,
        case_sensitive: bool,
    ) -> Self {
        RequestElement::Contains {
            column: column.into(),
            value: value.into(),
            case_sensitive,
        }
    }

    /// Creates a `StartsWith` node.
    pub fn starts_with(
        column: impl Into<ColumnName>,
        value: impl Into<Value>,
        case_sensitive: bool,
    ) -> Self {
        RequestElement::StartsWith {
            column: column.into(),
            value: value.into(),
            case_sensitive,
        }
    }

    /// Creates an `EndsWith` node.
    pub fn ends_with(
        column: impl Into<ColumnName>,
        value: impl Into<Value>,
        case_sensitive: bool,
    ) -> Self {
        RequestElement::EndsWith {
            column: column.into(),
            value: value.into(),
            case_sensitive,
        }
    }

    /// Returns `true` if this node always yields a boolean.
    pub fn is_predicate(&self) -> bool {
        !matches!(self, RequestElement::ColumnName(_) | RequestElement::Value(_))
    }
}

impl From<ColumnName> for RequestElement {
    fn from(column: ColumnName) -> Self {
        RequestElement::ColumnName(column)
    }
}

impl From<Value> for RequestElement {
    fn from(value: Value) -> Self {
        RequestElement::Value(value)
    }
}
