pub mod auth;
pub mod branch;
pub mod lead;
pub mod rbac;
