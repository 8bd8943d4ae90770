// handlers/elevated/mod.rs - Elevated handlers (admin session required)
//
// Security Level: verified session + admin role claim or admin registry entry
// Route Prefix: /api/admin
// Clients: service client; these reads span every user's rows.

pub mod activity;    // GET /api/admin/activity/recent
pub mod maintenance; // POST /api/admin/maintenance/:script
pub mod revenue;     // GET /api/admin/revenue-summary[/lifetime]
pub mod settings;    // PUT /api/admin/settings/:key

pub use activity::activity_recent;
pub use maintenance::maintenance_run;
pub use revenue::{revenue_lifetime, revenue_summary};
pub use settings::settings_put;
