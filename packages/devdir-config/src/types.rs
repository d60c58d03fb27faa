use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub identity: Identity,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	/// Either "postgres" or "memory".
	pub backend: String,
	/// Collection that holds profile documents.
	pub collection: String,
	/// Required when `backend` is "postgres".
	pub postgres: Option<Postgres>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_acquire_timeout_ms")]
	pub acquire_timeout_ms: u64,
}

/// GitHub user lookup used to enrich new profiles.
#[derive(Debug, Clone, Deserialize)]
pub struct Identity {
	pub enabled: bool,
	pub api_base: String,
	pub user_agent: String,
	/// Optional. Blank values are treated as absent.
	pub token: Option<String>,
	pub timeout_ms: u64,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_acquire_timeout_ms() -> u64 {
	2_000
}
