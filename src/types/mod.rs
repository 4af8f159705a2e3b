//! Core types for datagate.
//!
//! This module provides the data model shared by the query engine:
//!
//! - [`RequestElement`]: Any node of a predicate expression
//! - [`ColumnName`], [`Value`], [`Literal`]: The leaves of a predicate
//! - [`DataType`]: The closed set of types a node can carry
//! - [`Column`]: A schema entry a predicate is evaluated against

mod column;
mod data_type;
mod element;

pub use column::{Column, Columns};
pub use data_type::DataType;
pub use element::{ColumnName, Literal, RequestElement, Value};
