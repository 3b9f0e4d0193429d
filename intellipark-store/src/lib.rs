pub mod app_config;
pub mod rtdb;
pub mod xendit;

pub use rtdb::RtdbClient;
pub use xendit::XenditClient;
