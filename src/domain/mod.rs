pub mod error;
pub mod http_status;
pub mod notifier;
pub mod repository;
pub mod todo;
pub mod transport;
