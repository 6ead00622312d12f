// Tue Jan 13 2026 - Alex

pub mod manager;
pub mod template;

pub use manager::OutputManager;
pub use template::{file_banner, test_harness};
