use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{Result, schema};

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &devdir_config::Postgres) -> Result<Self> {
		let pool = PgPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.acquire_timeout(Duration::from_millis(cfg.acquire_timeout_ms))
			.connect(&cfg.dsn)
			.await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();
		let lock_id: i64 = 4_310_227;
		// Advisory locks are held per connection. Use a single transaction so the lock is scoped to
		// one connection and automatically released when the transaction ends.
		let mut tx = self.pool.begin().await?;

		sqlx::query("SELECT pg_advisory_xact_lock($1)").bind(lock_id).execute(&mut *tx).await?;

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&mut *tx).await?;
		}

		tx.commit().await?;

		Ok(())
	}

	pub async fn ensure_unique_key(&self, collection: &str, field: &str) -> Result<()> {
		let sql = schema::render_unique_key(collection, field)?;

		sqlx::query(&sql).execute(&self.pool).await?;

		Ok(())
	}
}
