pub mod admin;

pub mod auth;

pub mod enrollments;

pub mod lookups;

pub mod panel;

pub mod system;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use enrollments::configure_enrollment_routes;
pub use system::configure_system_routes;
