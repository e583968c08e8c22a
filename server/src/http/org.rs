use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use platform_db::OrgContext;

use super::AppState;

/// Organization of the caller.
///
/// Always the configured default organization; a real deployment would
/// derive it from the authenticated session instead.
#[derive(Clone, Copy, Debug)]
pub struct CurrentOrg(pub OrgContext);

impl FromRequestParts<AppState> for CurrentOrg {
    type Rejection = Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(CurrentOrg(OrgContext::new(state.org_id)))
    }
}
