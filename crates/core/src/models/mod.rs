pub mod ledger;
pub mod loading;
pub mod settings;
pub mod snapshot;
pub mod transaction;
