pub mod auth;
pub mod branches;
pub mod leads;
pub mod rbac;
pub mod users;
