//! Symbolic reason codes attached to bad-parameter errors.

/// Why a predicate or token was rejected.
///
/// Reason codes are stable identifiers the transport layer can forward to
/// clients (see [`Reason::code`]) so they can localize the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Reason {
    /// A column name is not part of the schema the predicate is evaluated against.
    #[error("unknown column")]
    UnknownColumn,

    /// An `And`/`Or` operand is typed as something other than BOOLEAN.
    #[error("children not boolean")]
    ChildrenNotBoolean,

    /// The two sides of a comparison have incompatible types.
    #[error("different left/right type")]
    DifferentLeftRightType,

    /// The column of a string operator is not a STRING column.
    #[error("column not string")]
    ColumnNotString,

    /// The value of a string operator is typed as something other than STRING.
    #[error("value not string")]
    ValueNotString,

    /// A predicate node has no type after inference completed.
    #[error("untyped element")]
    UntypedElement,

    /// A refresh token is not shaped like a refresh identifier.
    #[error("malformed token")]
    MalformedToken,

    /// An access token could not be decoded or its signature did not verify.
    #[error("invalid token")]
    InvalidToken,
}

impl Reason {
    /// Returns the machine-readable code for this reason.
    pub fn code(&self) -> &'static str {
        match self {
            Reason::UnknownColumn => "unknown_column",
            Reason::ChildrenNotBoolean => "children_not_boolean",
            Reason::DifferentLeftRightType => "different_left_right_type",
            Reason::ColumnNotString => "column_not_string",
            Reason::ValueNotString => "value_not_string",
            Reason::UntypedElement => "untyped_element",
            Reason::MalformedToken => "malformed_token",
            Reason::InvalidToken => "invalid_token",
        }
    }
}
