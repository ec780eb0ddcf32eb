pub mod snapshot_service;
pub mod transaction_service;
