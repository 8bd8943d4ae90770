pub mod activity;
pub mod maintenance;
pub mod revenue;
pub mod settings;
pub mod status;
pub mod token;
