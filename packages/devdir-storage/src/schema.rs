use crate::{Result, document::check_field_name};

pub fn render_schema() -> String {
	"\
CREATE TABLE IF NOT EXISTS documents (
	doc_id uuid PRIMARY KEY,
	collection text NOT NULL,
	seq bigserial NOT NULL,
	body jsonb NOT NULL,
	inserted_at timestamptz NOT NULL DEFAULT now()
);
CREATE INDEX IF NOT EXISTS documents_collection_seq_idx ON documents (collection, seq);
CREATE INDEX IF NOT EXISTS documents_body_idx ON documents USING gin (body jsonb_path_ops);"
		.to_string()
}

/// Partial unique index over one top-level field of one collection. Null or absent values
/// are not constrained.
pub fn render_unique_key(collection: &str, field: &str) -> Result<String> {
	check_field_name(collection)?;
	check_field_name(field)?;

	Ok(format!(
		"\
CREATE UNIQUE INDEX IF NOT EXISTS documents_{collection}_{field}_key
ON documents ((body ->> '{field}'))
WHERE collection = '{collection}' AND body ->> '{field}' IS NOT NULL"
	))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn schema_creates_documents_table() {
		let sql = render_schema();

		assert!(sql.contains("CREATE TABLE IF NOT EXISTS documents"));
		assert_eq!(sql.split(';').filter(|statement| !statement.trim().is_empty()).count(), 3);
	}

	#[test]
	fn unique_key_is_scoped_to_collection() {
		let sql = render_unique_key("profiles", "github_username").expect("render failed");

		assert!(sql.contains("documents_profiles_github_username_key"));
		assert!(sql.contains("collection = 'profiles'"));
	}

	#[test]
	fn unique_key_rejects_unsafe_names() {
		assert!(render_unique_key("profiles'; --", "github_username").is_err());
		assert!(render_unique_key("profiles", "a b").is_err());
	}
}
