pub mod crm_client;
pub use crm_client::{BackendLogin, CrmBackend};
pub mod http_client;
pub use http_client::HttpCrmBackend;
pub mod retry;
pub use retry::RetryPolicy;
