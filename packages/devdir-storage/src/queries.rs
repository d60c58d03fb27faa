//! [`DocumentStore`] over a single Postgres `documents` table with JSONB bodies.
//!
//! Filters bind as JSONB and match with `@>`. Pipelines compile into one SELECT whose body
//! expression is rewritten stage by stage; field names reach the SQL text only after
//! [`crate::document::is_field_name`] has accepted them.

use serde_json::Value;
use uuid::Uuid;

use crate::{
	BoxFuture, Document, DocumentStore, Error, Expr, Filter, INTERNAL_ID_FIELD, InsertAck,
	Result, SortOrder, Stage, WriteAck,
	db::Db,
	document::{check_field_name, check_filter, check_key_filter, check_patch, check_pipeline},
};

const EXPOSED_BODY: &str = "(d.body || jsonb_build_object('_id', d.doc_id::text))";
const FIRST_MATCH: &str = "\
SELECT doc_id
FROM documents
WHERE collection = $1 AND body @> $2
ORDER BY seq
LIMIT 1";

impl DocumentStore for Db {
	fn insert<'a>(
		&'a self,
		collection: &'a str,
		mut document: Document,
	) -> BoxFuture<'a, Result<InsertAck>> {
		Box::pin(async move {
			document.remove(INTERNAL_ID_FIELD);

			let doc_id = Uuid::new_v4();
			let result =
				sqlx::query("INSERT INTO documents (doc_id, collection, body) VALUES ($1, $2, $3)")
					.bind(doc_id)
					.bind(collection)
					.bind(Value::Object(document))
					.execute(&self.pool)
					.await
					.map_err(map_write_error)?;

			Ok(InsertAck {
				acknowledged: result.rows_affected() == 1,
				inserted_id: doc_id.to_string(),
			})
		})
	}

	fn find_one<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
	) -> BoxFuture<'a, Result<Option<Document>>> {
		Box::pin(async move {
			check_filter(filter)?;

			let sql = format!(
				"SELECT {EXPOSED_BODY} FROM documents d \
				 WHERE d.collection = $1 AND d.body @> $2 ORDER BY d.seq LIMIT 1"
			);
			let row: Option<Value> = sqlx::query_scalar(&sql)
				.bind(collection)
				.bind(Value::Object(filter.clone()))
				.fetch_optional(&self.pool)
				.await?;

			row.map(into_document).transpose()
		})
	}

	fn find_all<'a>(&'a self, collection: &'a str) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move {
			let sql = format!(
				"SELECT {EXPOSED_BODY} FROM documents d WHERE d.collection = $1 ORDER BY d.seq"
			);
			let rows: Vec<Value> =
				sqlx::query_scalar(&sql).bind(collection).fetch_all(&self.pool).await?;

			rows.into_iter().map(into_document).collect()
		})
	}

	fn find_many<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move {
			check_filter(filter)?;

			let sql = format!(
				"SELECT {EXPOSED_BODY} FROM documents d \
				 WHERE d.collection = $1 AND d.body @> $2 ORDER BY d.seq"
			);
			let rows: Vec<Value> = sqlx::query_scalar(&sql)
				.bind(collection)
				.bind(Value::Object(filter.clone()))
				.fetch_all(&self.pool)
				.await?;

			rows.into_iter().map(into_document).collect()
		})
	}

	fn aggregate<'a>(
		&'a self,
		collection: &'a str,
		pipeline: &'a [Stage],
	) -> BoxFuture<'a, Result<Vec<Document>>> {
		Box::pin(async move {
			let sql = compile_pipeline(pipeline)?;
			let rows: Vec<Value> =
				sqlx::query_scalar(&sql).bind(collection).fetch_all(&self.pool).await?;

			rows.into_iter().map(into_document).collect()
		})
	}

	fn update<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
		patch: Document,
	) -> BoxFuture<'a, Result<WriteAck>> {
		Box::pin(async move {
			check_key_filter(filter)?;
			check_patch(&patch)?;

			let sql =
				format!("UPDATE documents SET body = body || $3 WHERE doc_id = ({FIRST_MATCH})");
			let result = sqlx::query(&sql)
				.bind(collection)
				.bind(Value::Object(filter.clone()))
				.bind(Value::Object(patch))
				.execute(&self.pool)
				.await
				.map_err(map_write_error)?;

			Ok(WriteAck { matched: result.rows_affected() })
		})
	}

	fn delete<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
	) -> BoxFuture<'a, Result<WriteAck>> {
		Box::pin(async move {
			check_key_filter(filter)?;

			let sql = format!("DELETE FROM documents WHERE doc_id = ({FIRST_MATCH})");
			let result = sqlx::query(&sql)
				.bind(collection)
				.bind(Value::Object(filter.clone()))
				.execute(&self.pool)
				.await?;

			Ok(WriteAck { matched: result.rows_affected() })
		})
	}

	fn increment<'a>(
		&'a self,
		collection: &'a str,
		filter: &'a Filter,
		field: &'a str,
		by: i64,
	) -> BoxFuture<'a, Result<WriteAck>> {
		Box::pin(async move {
			check_key_filter(filter)?;
			check_field_name(field)?;

			if by < 0 {
				return Err(Error::InvalidArgument("Increment must be non-negative.".to_string()));
			}

			let sql = format!(
				"\
UPDATE documents
SET body = jsonb_set(
	body,
	ARRAY[$3::text],
	to_jsonb(COALESCE((body ->> $3::text)::bigint, 0) + $4)
)
WHERE doc_id = ({FIRST_MATCH})"
			);
			let result = sqlx::query(&sql)
				.bind(collection)
				.bind(Value::Object(filter.clone()))
				.bind(field)
				.bind(by)
				.execute(&self.pool)
				.await?;

			Ok(WriteAck { matched: result.rows_affected() })
		})
	}
}

/// One SELECT over the collection. Sorts accumulate so later keys take precedence and
/// earlier keys break their ties, which equals a sequence of stable sorts; `d.seq` breaks
/// what is left.
pub fn compile_pipeline(pipeline: &[Stage]) -> Result<String> {
	check_pipeline(pipeline)?;

	let mut body = EXPOSED_BODY.to_string();
	let mut order: Vec<String> = Vec::new();

	for stage in pipeline {
		match stage {
			Stage::AddFields(fields) => {
				let pairs = fields
					.iter()
					.map(|(name, expr)| format!("'{name}', {}", compile_expr(expr, &body)))
					.collect::<Vec<_>>();

				body = format!("({body} || jsonb_build_object({}))", pairs.join(", "));
			},
			Stage::Sort(keys) => {
				let mut next = keys
					.iter()
					.map(|key| {
						let direction = match key.order {
							SortOrder::Ascending => "ASC NULLS FIRST",
							SortOrder::Descending => "DESC NULLS LAST",
						};

						format!("({body} -> '{}') {direction}", key.field)
					})
					.collect::<Vec<_>>();

				next.append(&mut order);

				order = next;
			},
			Stage::Project(fields) =>
				for field in fields {
					body = format!("({body} - '{field}')");
				},
		}
	}

	order.push("d.seq ASC".to_string());

	Ok(format!(
		"SELECT {body} AS body FROM documents d WHERE d.collection = $1 ORDER BY {}",
		order.join(", ")
	))
}

fn compile_expr(expr: &Expr, body: &str) -> String {
	match expr {
		Expr::Field(name) => format!("COALESCE(({body} ->> '{name}')::double precision, 0)"),
		Expr::Literal(value) => format!("({value}::double precision)"),
		Expr::Multiply(items) if items.is_empty() => "1".to_string(),
		Expr::Multiply(items) => format!(
			"({})",
			items.iter().map(|item| compile_expr(item, body)).collect::<Vec<_>>().join(" * ")
		),
		Expr::Sqrt(inner) => format!("sqrt(GREATEST({}, 0))", compile_expr(inner, body)),
	}
}

fn into_document(value: Value) -> Result<Document> {
	match value {
		Value::Object(map) => Ok(map),
		other => Err(Error::InvalidArgument(format!("Stored body is not an object: {other}."))),
	}
}

fn map_write_error(err: sqlx::Error) -> Error {
	if let sqlx::Error::Database(db_err) = &err
		&& db_err.is_unique_violation()
	{
		return Error::Conflict(db_err.message().to_string());
	}

	Error::Sqlx(err)
}
