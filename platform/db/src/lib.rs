//! Connection pool wiring, environment settings and the organization context
//! every CRM service call runs under.

use std::time::Duration;

use entity::organization;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use thiserror::Error;
use tracing::{info, instrument};

/// Shared connection pool. Cloning is cheap.
pub type DbPool = DatabaseConnection;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing (set {0})")]
    MissingUrl(String),
    #[error("invalid value for {key}: {value}")]
    InvalidSetting { key: &'static str, value: String },
    #[error(transparent)]
    Db(#[from] DbErr),
}

pub type DbResult<T> = Result<T, DbError>;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 8;

/// Environment-driven pool settings.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    pub sql_logging: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            sql_logging: false,
        }
    }
}

impl DatabaseSettings {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Reads `DATABASE_URL`, `DATABASE_MAX_CONNECTIONS`,
    /// `DATABASE_CONNECT_TIMEOUT_SECS` and `DATABASE_SQL_LOGGING`.
    pub fn from_env() -> DbResult<Self> {
        let url = std::env::var("DATABASE_URL").ok();
        let max_connections = parse_env("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        let connect_timeout_secs =
            parse_env("DATABASE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let sql_logging = std::env::var("DATABASE_SQL_LOGGING")
            .ok()
            .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            url,
            max_connections,
            connect_timeout_secs,
            sql_logging,
        })
    }

    pub fn database_url(&self) -> DbResult<&str> {
        self.url
            .as_deref()
            .ok_or_else(|| DbError::MissingUrl("DATABASE_URL".into()))
    }

    fn connect_options(&self) -> DbResult<ConnectOptions> {
        let url = self.database_url()?;
        // Every connection to an in-memory SQLite database sees its own empty database.
        let max_connections = if url.starts_with("sqlite") && url.contains(":memory:") {
            1
        } else {
            self.max_connections
        };
        let mut options = ConnectOptions::new(url.to_owned());
        options
            .max_connections(max_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .sqlx_logging(self.sql_logging);
        Ok(options)
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, default: T) -> DbResult<T> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| DbError::InvalidSetting { key, value }),
        Err(_) => Ok(default),
    }
}

/// Open the shared pool.
pub async fn connect(settings: &DatabaseSettings) -> DbResult<DbPool> {
    let options = settings.connect_options()?;
    let pool = Database::connect(options).await?;
    info!(
        backend = ?pool.get_database_backend(),
        max_connections = settings.max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Organization the current caller acts for.
///
/// Resolved once per request and passed explicitly into every service call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrgContext {
    pub org_id: i32,
}

impl OrgContext {
    pub fn new(org_id: i32) -> Self {
        Self { org_id }
    }
}

/// Returns the id of the organization called `name`, creating it when absent.
#[instrument(skip(pool))]
pub async fn ensure_default_org(pool: &DbPool, name: &str, email: &str) -> DbResult<i32> {
    let existing = organization::Entity::find()
        .filter(organization::Column::Name.eq(name))
        .order_by_asc(organization::Column::Id)
        .one(pool)
        .await?;
    if let Some(org) = existing {
        return Ok(org.id);
    }
    let created = organization::ActiveModel {
        name: Set(name.to_owned()),
        email: Set(Some(email.to_owned())),
        ..Default::default()
    }
    .insert(pool)
    .await?;
    info!(org_id = created.id, "created default organization");
    Ok(created.id)
}

/// Checks that an organization row exists for `org_id`.
pub async fn org_exists(pool: &DbPool, org_id: i32) -> DbResult<bool> {
    Ok(organization::Entity::find_by_id(org_id)
        .one(pool)
        .await?
        .is_some())
}
