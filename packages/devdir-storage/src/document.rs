//! Document, filter, and aggregation-stage types shared by every store.

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Key under which read paths expose the store-assigned identifier.
pub const INTERNAL_ID_FIELD: &str = "_id";

pub type Document = Map<String, Value>;

/// Match document. A stored document matches when it contains every key with an equal
/// value; arrays and objects match by containment.
pub type Filter = Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
	Ascending,
	Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
	pub field: String,
	pub order: SortOrder,
}
impl SortKey {
	pub fn descending(field: impl Into<String>) -> Self {
		Self { field: field.into(), order: SortOrder::Descending }
	}

	pub fn ascending(field: impl Into<String>) -> Self {
		Self { field: field.into(), order: SortOrder::Ascending }
	}
}

/// Numeric expression evaluated per document. Missing or null fields read as zero.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
	Field(String),
	Literal(f64),
	Multiply(Vec<Expr>),
	/// Square root; negative input is clamped to zero.
	Sqrt(Box<Expr>),
}
impl Expr {
	pub fn field(name: impl Into<String>) -> Self {
		Self::Field(name.into())
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stage {
	/// Stable sort. Ties keep the order produced by earlier stages.
	Sort(Vec<SortKey>),
	/// Computed fields, evaluated against the document as it enters the stage.
	AddFields(Vec<(String, Expr)>),
	/// Field exclusion.
	Project(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertAck {
	pub acknowledged: bool,
	pub inserted_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteAck {
	/// Documents matched by the key filter. Single-document writes report 0 or 1.
	pub matched: u64,
}
impl WriteAck {
	pub fn acknowledged(&self) -> bool {
		self.matched > 0
	}
}

pub fn filter_eq(field: &str, value: impl Into<Value>) -> Filter {
	let mut filter = Filter::new();

	filter.insert(field.to_string(), value.into());

	filter
}

/// Plain identifier: an ASCII letter or underscore followed by letters, digits, or
/// underscores. Only names of this shape are ever spliced into query text.
pub fn is_field_name(name: &str) -> bool {
	let mut chars = name.chars();

	match chars.next() {
		Some(first) if first == '_' || first.is_ascii_alphabetic() => {},
		_ => return false,
	}

	chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

pub(crate) fn check_field_name(name: &str) -> Result<()> {
	if is_field_name(name) {
		Ok(())
	} else {
		Err(Error::InvalidArgument(format!("{name:?} is not a valid field name.")))
	}
}

pub(crate) fn check_filter(filter: &Filter) -> Result<()> {
	filter.keys().try_for_each(|key| check_field_name(key))
}

/// Writes keyed on an empty filter would hit an arbitrary document.
pub(crate) fn check_key_filter(filter: &Filter) -> Result<()> {
	if filter.is_empty() {
		return Err(Error::InvalidArgument("Key filter must not be empty.".to_string()));
	}

	check_filter(filter)
}

pub(crate) fn check_patch(patch: &Document) -> Result<()> {
	if patch.contains_key(INTERNAL_ID_FIELD) {
		return Err(Error::InvalidArgument(format!("{INTERNAL_ID_FIELD} cannot be written.")));
	}

	patch.keys().try_for_each(|key| check_field_name(key))
}

pub(crate) fn check_pipeline(pipeline: &[Stage]) -> Result<()> {
	for stage in pipeline {
		match stage {
			Stage::Sort(keys) => {
				if keys.is_empty() {
					return Err(Error::InvalidArgument(
						"Sort stage needs at least one key.".to_string(),
					));
				}

				keys.iter().try_for_each(|key| check_field_name(&key.field))?;
			},
			Stage::AddFields(fields) =>
				for (name, expr) in fields {
					check_field_name(name)?;
					check_expr(expr)?;
				},
			Stage::Project(fields) => fields.iter().try_for_each(|field| check_field_name(field))?,
		}
	}

	Ok(())
}

fn check_expr(expr: &Expr) -> Result<()> {
	match expr {
		Expr::Field(name) => check_field_name(name),
		Expr::Literal(value) if !value.is_finite() =>
			Err(Error::InvalidArgument("Literal values must be finite.".to_string())),
		Expr::Literal(_) => Ok(()),
		Expr::Multiply(items) => items.iter().try_for_each(check_expr),
		Expr::Sqrt(inner) => check_expr(inner),
	}
}
