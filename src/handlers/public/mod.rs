// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Route Prefix: no /api prefix
// Clients: service client only, and only for reads that must succeed for
// anonymous visitors (feature flags, health).

pub mod auth;     // GET /auth/status
pub mod settings; // GET /settings/:key
pub mod system;   // GET /, GET /health

pub use auth::auth_status;
pub use settings::settings_get;
pub use system::{health, root};
