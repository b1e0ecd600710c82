pub mod memory_repo;
pub mod reqwest_transport;
pub mod toasts;
