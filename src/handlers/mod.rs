// handlers/mod.rs - 3-Tier Handler Architecture
//
// Public (no session) -> Protected (verified session) -> Elevated (admin session)
//
// Protected and elevated handlers sit behind `middleware::require_authenticated`
// and `middleware::require_admin` respectively and read the injected
// `SessionContext` from request extensions.
pub mod public;    // Tier 1: no authentication (/, /health, /auth/status, /settings/*)
pub mod protected; // Tier 2: verified session (/api/me, /api/prompts, /api/favorites)
pub mod elevated;  // Tier 3: admin session (/api/admin/*)

use serde::Deserialize;

/// `?limit=` for list endpoints; clamped by `AppConfig::list_limit`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}
