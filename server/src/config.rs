use anyhow::{Context, Result, bail};
use platform_db::{DbPool, ensure_default_org, org_exists};
use tracing::warn;

/// Origin entry that lets any origin through CORS.
pub const ANY_ORIGIN: &str = "*";

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Fixed tenant for every request. When unset the organization named
    /// `default_org_name` is looked up or created at startup.
    pub default_org_id: Option<i32>,
    pub default_org_name: String,
    pub default_org_email: String,
    pub cors_allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        let default_org_id = match std::env::var("DEFAULT_ORG_ID") {
            Ok(raw) => Some(
                raw.trim()
                    .parse::<i32>()
                    .with_context(|| format!("invalid DEFAULT_ORG_ID {raw:?}"))?,
            ),
            Err(_) => None,
        };
        let default_org_name =
            std::env::var("DEFAULT_ORG_NAME").unwrap_or_else(|_| "Default".into());
        let default_org_email =
            std::env::var("DEFAULT_ORG_EMAIL").unwrap_or_else(|_| "admin@example.com".into());

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
        )?;

        Ok(Self {
            default_org_id,
            default_org_name,
            default_org_email,
            cors_allowed_origins,
        })
    }
}

/// Splits a comma-separated origin list. `*` allows every origin; a list
/// with no entries at all is rejected.
fn parse_origins(raw: &str) -> Result<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if origins.is_empty() {
        bail!("CORS_ALLOWED_ORIGINS is set but lists no origins; use `*` to allow any origin");
    }
    Ok(origins)
}

/// Organization every request acts for.
///
/// `DEFAULT_ORG_ID` wins when set, even if no such organization exists yet
/// (writes then fail with "Organization not found"). Otherwise the organization
/// named `default_org_name` is looked up or created.
pub async fn resolve_org(pool: &DbPool, config: &AppConfig) -> Result<i32> {
    if let Some(org_id) = config.default_org_id {
        if !org_exists(pool, org_id).await? {
            warn!(org_id, "DEFAULT_ORG_ID does not match any organization; writes will fail");
        }
        return Ok(org_id);
    }
    let org_id =
        ensure_default_org(pool, &config.default_org_name, &config.default_org_email).await?;
    Ok(org_id)
}
