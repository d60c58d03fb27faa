use std::{future::Future, pin::Pin};

use crate::{Document, Filter, InsertAck, Result, Stage, WriteAck};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Narrow document-database boundary.
///
/// Every operation is a single round trip and fails with [`crate::Error`] instead of retrying.
/// Writes keyed on a filter touch at most one document, the first match in native order.
/// Read paths expose the store identifier under [`crate::INTERNAL_ID_FIELD`].
pub trait DocumentStore
where
	Self: Send + Sync,
{
	fn insert<'a>(
		&'a self,
		collection: &'a str,
		document: Document,
	) -> BoxFuture<'a, Result<InsertAck>>;

	fn find_one<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
	) -> BoxFuture<'a, Result<Option<Document>>>;

	fn find_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Document>>>;

	fn find_many<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
	) -> BoxFuture<'a, Result<Vec<Document>>>;

	/// Runs `pipeline` over the whole collection, applying stages in order.
	fn aggregate<'a>(
		&'a self,
		collection: &'a str,
		pipeline: &'a [Stage],
	) -> BoxFuture<'a, Result<Vec<Document>>>;

	/// Merges the top-level keys of `patch` into the first matching document.
	fn update<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
		patch: Document,
	) -> BoxFuture<'a, Result<WriteAck>>;

	fn delete<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
	) -> BoxFuture<'a, Result<WriteAck>>;

	/// Atomically adds `by` (non-negative) to an integer field, treating a missing field as 0.
	fn increment<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
		field: &'a str,
		by: i64,
	) -> BoxFuture<'a, Result<WriteAck>>;
}
