// handlers/protected/mod.rs - Protected handlers (verified session required)
//
// Security Level: signed access token (cookie or bearer)
// Route Prefix: /api
// Clients: per-user client only, so row-level policies scope every read.

pub mod library; // GET /api/prompts, GET /api/favorites
pub mod me;      // GET /api/me

pub use library::{favorites_get, prompts_get};
pub use me::me_get;
