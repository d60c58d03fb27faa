mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Identity, Postgres, Service, Storage};

use std::{fs, path::Path};

pub const BACKEND_POSTGRES: &str = "postgres";
pub const BACKEND_MEMORY: &str = "memory";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let backend = cfg.storage.backend.as_str();

	if !matches!(backend, BACKEND_POSTGRES | BACKEND_MEMORY) {
		return Err(Error::Validation {
			message: "storage.backend must be one of postgres or memory.".to_string(),
		});
	}
	if !is_identifier(&cfg.storage.collection) {
		return Err(Error::Validation {
			message: "storage.collection must be a plain identifier.".to_string(),
		});
	}
	if backend == BACKEND_POSTGRES {
		let Some(postgres) = cfg.storage.postgres.as_ref() else {
			return Err(Error::Validation {
				message: "storage.postgres is required when storage.backend is postgres."
					.to_string(),
			});
		};

		if postgres.dsn.trim().is_empty() {
			return Err(Error::Validation {
				message: "storage.postgres.dsn must be non-empty.".to_string(),
			});
		}
		if postgres.pool_max_conns == 0 {
			return Err(Error::Validation {
				message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
			});
		}
		if postgres.acquire_timeout_ms == 0 {
			return Err(Error::Validation {
				message: "storage.postgres.acquire_timeout_ms must be greater than zero."
					.to_string(),
			});
		}
	}
	if cfg.identity.enabled {
		for (label, value) in [
			("identity.api_base", &cfg.identity.api_base),
			("identity.user_agent", &cfg.identity.user_agent),
		] {
			if value.trim().is_empty() {
				return Err(Error::Validation {
					message: format!("{label} must be non-empty when identity is enabled."),
				});
			}
		}

		if cfg.identity.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "identity.timeout_ms must be greater than zero.".to_string(),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.identity.token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false) {
		cfg.identity.token = None;
	}

	cfg.identity.api_base = cfg.identity.api_base.trim_end_matches('/').to_string();
	cfg.storage.backend = cfg.storage.backend.trim().to_ascii_lowercase();
}

fn is_identifier(value: &str) -> bool {
	let mut chars = value.chars();

	match chars.next() {
		Some(first) if first == '_' || first.is_ascii_alphabetic() => {},
		_ => return false,
	}

	chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
