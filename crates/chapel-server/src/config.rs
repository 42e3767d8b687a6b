use std::net::SocketAddr;
use std::path::PathBuf;

use chapel_store::seed::OwnerSeed;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DIST_DIR: &str = "dist";
const DEFAULT_DEV_SERVER: &str = "http://localhost:5173";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// How requests outside `/api` are answered.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetMode {
    /// Prebuilt files, with `index.html` for any unknown path.
    Static { dist_dir: PathBuf },
    /// Forward to the frontend dev server.
    DevProxy { upstream: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_url: String,
    pub store_key: String,
    pub addr: SocketAddr,
    pub assets: AssetMode,
    pub owner: Option<OwnerSeed>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Blank values count as
    /// unset. Store credentials have no fallback.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let store_url = var("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let store_key = var("SUPABASE_SERVICE_ROLE_KEY")
            .ok_or(ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))?;

        let host = var("CHAPEL_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = match var("CHAPEL_PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "CHAPEL_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };
        let addr: SocketAddr =
            format!("{}:{}", host, port)
                .parse()
                .map_err(|_| ConfigError::Invalid {
                    name: "CHAPEL_HOST",
                    value: host,
                })?;

        let assets = if var("CHAPEL_ENV").as_deref() == Some("production") {
            AssetMode::Static {
                dist_dir: var("CHAPEL_DIST_DIR")
                    .unwrap_or_else(|| DEFAULT_DIST_DIR.into())
                    .into(),
            }
        } else {
            AssetMode::DevProxy {
                upstream: var("CHAPEL_DEV_SERVER_URL").unwrap_or_else(|| DEFAULT_DEV_SERVER.into()),
            }
        };

        let owner = match (
            var("CHAPEL_OWNER_EMAIL"),
            var("CHAPEL_OWNER_CPF"),
            var("CHAPEL_OWNER_PASSWORD"),
        ) {
            (Some(email), Some(cpf), Some(password)) => Some(OwnerSeed {
                name: var("CHAPEL_OWNER_NAME").unwrap_or_else(|| "Proprietário".into()),
                email,
                cpf,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            store_url,
            store_key,
            addr,
            assets,
            owner,
        })
    }
}
