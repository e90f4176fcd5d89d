pub mod auth;
pub use auth::AuthService;
pub mod crm_service;
pub use crm_service::CrmService;
pub mod rbac_service;
pub mod session;
pub use session::SessionStore;
pub mod team_service;
pub mod visibility;
