//! In-process document store.
//!
//! Collections are insertion-ordered vectors behind one lock, so every call is atomic with
//! respect to every other call. Matching and ordering follow the Postgres store: JSONB
//! containment for filters and JSONB type ordering for sorts.

use std::{
	cmp::Ordering,
	collections::{HashMap, HashSet},
	future,
	sync::RwLock,
};

use serde_json::{Number, Value};
use uuid::Uuid;

use crate::{
	BoxFuture, Document, DocumentStore, Error, Expr, Filter, INTERNAL_ID_FIELD, InsertAck,
	Result, SortKey, SortOrder, Stage, WriteAck,
	document::{check_field_name, check_filter, check_key_filter, check_patch, check_pipeline},
};

struct Entry {
	id: Uuid,
	body: Document,
}
impl Entry {
	fn exposed(&self) -> Document {
		let mut doc = self.body.clone();

		doc.insert(INTERNAL_ID_FIELD.to_string(), Value::String(self.id.to_string()));

		doc
	}
}

#[derive(Default)]
pub struct MemoryStore {
	collections: RwLock<HashMap<String, Vec<Entry>>>,
	unique_keys: HashSet<(String, String)>,
}
impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Rejects writes that would give two documents in `collection` the same non-null
	/// `field` value.
	pub fn with_unique_key(mut self, collection: &str, field: &str) -> Self {
		self.unique_keys.insert((collection.to_string(), field.to_string()));

		self
	}

	fn read<T>(&self, f: impl FnOnce(&HashMap<String, Vec<Entry>>) -> T) -> T {
		let guard = self.collections.read().unwrap_or_else(|err| err.into_inner());

		f(&guard)
	}

	fn write<T>(&self, f: impl FnOnce(&mut HashMap<String, Vec<Entry>>) -> T) -> T {
		let mut guard = self.collections.write().unwrap_or_else(|err| err.into_inner());

		f(&mut guard)
	}

	fn check_unique(
		&self,
		collection: &str,
		entries: &[Entry],
		candidate: &Document,
		skip: Option<Uuid>,
	) -> Result<()> {
		for (unique_collection, field) in &self.unique_keys {
			if unique_collection != collection {
				continue;
			}

			let Some(value) = candidate.get(field).filter(|value| !value.is_null()) else {
				continue;
			};
			let taken = entries.iter().any(|entry| {
				Some(entry.id) != skip
					&& entry.body.get(field).is_some_and(|existing| values_equal(existing, value))
			});

			if taken {
				return Err(Error::Conflict(format!("{collection}.{field} already exists.")));
			}
		}

		Ok(())
	}

	fn insert_sync(&self, collection: &str, mut document: Document) -> Result<InsertAck> {
		document.remove(INTERNAL_ID_FIELD);

		self.write(|collections| {
			let entries = collections.entry(collection.to_string()).or_default();

			self.check_unique(collection, entries, &document, None)?;

			let id = Uuid::new_v4();

			entries.push(Entry { id, body: document });

			Ok(InsertAck { acknowledged: true, inserted_id: id.to_string() })
		})
	}

	fn find_sync(&self, collection: &str, filter: Option<&Filter>) -> Result<Vec<Document>> {
		if let Some(filter) = filter {
			check_filter(filter)?;
		}

		Ok(self.read(|collections| {
			collections
				.get(collection)
				.map(|entries| {
					entries
						.iter()
						.filter(|entry| {
							filter.is_none_or(|filter| matches_filter(&entry.body, filter))
						})
						.map(Entry::exposed)
						.collect()
				})
				.unwrap_or_default()
		}))
	}

	fn aggregate_sync(&self, collection: &str, pipeline: &[Stage]) -> Result<Vec<Document>> {
		check_pipeline(pipeline)?;

		let mut docs = self.find_sync(collection, None)?;

		for stage in pipeline {
			apply_stage(&mut docs, stage)?;
		}

		Ok(docs)
	}

	fn update_sync(&self, collection: &str, filter: &Filter, patch: Document) -> Result<WriteAck> {
		check_key_filter(filter)?;
		check_patch(&patch)?;

		self.write(|collections| {
			let Some(entries) = collections.get_mut(collection) else {
				return Ok(WriteAck { matched: 0 });
			};
			let Some(index) = entries.iter().position(|entry| matches_filter(&entry.body, filter))
			else {
				return Ok(WriteAck { matched: 0 });
			};

			self.check_unique(collection, entries, &patch, Some(entries[index].id))?;

			entries[index].body.extend(patch);

			Ok(WriteAck { matched: 1 })
		})
	}

	fn delete_sync(&self, collection: &str, filter: &Filter) -> Result<WriteAck> {
		check_key_filter(filter)?;

		Ok(self.write(|collections| {
			let Some(entries) = collections.get_mut(collection) else {
				return WriteAck { matched: 0 };
			};

			match entries.iter().position(|entry| matches_filter(&entry.body, filter)) {
				Some(index) => {
					entries.remove(index);

					WriteAck { matched: 1 }
				},
				None => WriteAck { matched: 0 },
			}
		}))
	}

	fn increment_sync(
		&self,
		collection: &str,
		filter: &Filter,
		field: &str,
		by: i64,
	) -> Result<WriteAck> {
		check_key_filter(filter)?;
		check_field_name(field)?;

		if by < 0 {
			return Err(Error::InvalidArgument("Increment must be non-negative.".to_string()));
		}

		self.write(|collections| {
			let Some(entry) = collections.get_mut(collection).and_then(|entries| {
				entries.iter_mut().find(|entry| matches_filter(&entry.body, filter))
			}) else {
				return Ok(WriteAck { matched: 0 });
			};
			let current = match entry.body.get(field) {
				None | Some(Value::Null) => 0,
				Some(value) => value.as_i64().ok_or_else(|| {
					Error::InvalidArgument(format!("{field} is not an integer field."))
				})?,
			};
			let next = current
				.checked_add(by)
				.ok_or_else(|| Error::InvalidArgument(format!("{field} would overflow.")))?;

			entry.body.insert(field.to_string(), Value::from(next));

			Ok(WriteAck { matched: 1 })
		})
	}
}

impl DocumentStore for MemoryStore {
	fn insert<'a>(
		&'a self,
		collection: &'a str,
		document: Document,
	) -> BoxFuture<'a, Result<InsertAck>> {
		Box::pin(future::ready(self.insert_sync(collection, document)))
	}

	fn find_one<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
	) -> BoxFuture<'a, Result<Option<Document>>> {
		let result = self.find_sync(collection, Some(filter)).map(|docs| docs.into_iter().next());

		Box::pin(future::ready(result))
	}

	fn find_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(future::ready(self.find_sync(collection, None)))
	}

	fn find_many<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(future::ready(self.find_sync(collection, Some(filter))))
	}

	fn aggregate<'a>(
		&'a self,
		collection: &'a str,
		pipeline: &'a [Stage],
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(future::ready(self.aggregate_sync(collection, pipeline)))
	}

	fn update<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
		patch: Document,
	) -> BoxFuture<'a, Result<WriteAck>> {
		Box::pin(future::ready(self.update_sync(collection, filter, patch)))
	}

	fn delete<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
	) -> BoxFuture<'a, Result<WriteAck>> {
		Box::pin(future::ready(self.delete_sync(collection, filter)))
	}

	fn increment<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
		field: &'a str,
		by: i64,
	) -> BoxFuture<'a, Result<WriteAck>> {
		Box::pin(future::ready(self.increment_sync(collection, filter, field, by)))
	}
}

fn apply_stage(docs: &mut Vec<Document>, stage: &Stage) -> Result<()> {
	match stage {
		Stage::Sort(keys) => docs.sort_by(|a, b| compare_documents(a, b, keys)),
		Stage::AddFields(fields) =>
			for doc in docs.iter_mut() {
				let mut computed = Vec::with_capacity(fields.len());

				for (name, expr) in fields {
					let value = eval_expr(expr, doc)?;

					computed.push((
						name.clone(),
						Number::from_f64(value).map_or(Value::Null, Value::Number),
					));
				}

				doc.extend(computed);
			},
		Stage::Project(fields) =>
			for doc in docs.iter_mut() {
				for field in fields {
					doc.remove(field);
				}
			},
	}

	Ok(())
}

fn eval_expr(expr: &Expr, doc: &Document) -> Result<f64> {
	match expr {
		Expr::Field(name) => match doc.get(name) {
			None | Some(Value::Null) => Ok(0.0),
			Some(Value::Number(number)) => number.as_f64().ok_or_else(|| {
				Error::InvalidArgument(format!("{name} is not representable as a number."))
			}),
			Some(_) => Err(Error::InvalidArgument(format!("{name} is not a numeric field."))),
		},
		Expr::Literal(value) => Ok(*value),
		Expr::Multiply(items) => items
			.iter()
			.try_fold(1.0, |acc, item| -> Result<f64> { Ok(acc * eval_expr(item, doc)?) }),
		Expr::Sqrt(inner) => Ok(eval_expr(inner, doc)?.max(0.0).sqrt()),
	}
}

fn compare_documents(a: &Document, b: &Document, keys: &[SortKey]) -> Ordering {
	for key in keys {
		let ordering = compare_values(a.get(&key.field), b.get(&key.field));
		let ordering = match key.order {
			SortOrder::Ascending => ordering,
			SortOrder::Descending => ordering.reverse(),
		};

		if ordering != Ordering::Equal {
			return ordering;
		}
	}

	Ordering::Equal
}

/// Missing sorts lowest, then JSONB order: null < string < number < bool < array < object.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
	match (a, b) {
		(None, None) => Ordering::Equal,
		(None, Some(_)) => Ordering::Less,
		(Some(_), None) => Ordering::Greater,
		(Some(a), Some(b)) => match (a, b) {
			(Value::String(a), Value::String(b)) => a.cmp(b),
			(Value::Number(a), Value::Number(b)) => {
				let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));

				a.partial_cmp(&b).unwrap_or(Ordering::Equal)
			},
			(Value::Bool(a), Value::Bool(b)) => a.cmp(b),
			_ => type_rank(a).cmp(&type_rank(b)),
		},
	}
}

fn type_rank(value: &Value) -> u8 {
	match value {
		Value::Null => 0,
		Value::String(_) => 1,
		Value::Number(_) => 2,
		Value::Bool(_) => 3,
		Value::Array(_) => 4,
		Value::Object(_) => 5,
	}
}

fn matches_filter(body: &Document, filter: &Filter) -> bool {
	filter
		.iter()
		.all(|(key, expected)| body.get(key).is_some_and(|actual| contains(actual, expected)))
}

/// JSONB `@>` semantics below the top level.
fn contains(actual: &Value, expected: &Value) -> bool {
	match (actual, expected) {
		(Value::Object(actual), Value::Object(expected)) => expected
			.iter()
			.all(|(key, value)| actual.get(key).is_some_and(|inner| contains(inner, value))),
		(Value::Array(actual), Value::Array(expected)) =>
			expected.iter().all(|value| actual.iter().any(|inner| contains(inner, value))),
		(actual, expected) => values_equal(actual, expected),
	}
}

fn values_equal(a: &Value, b: &Value) -> bool {
	match (a, b) {
		(Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
		_ => a == b,
	}
}
