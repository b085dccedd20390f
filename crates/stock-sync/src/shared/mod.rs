pub mod batch;
pub mod config;
pub mod error;
pub mod marketplaces;
pub mod price;
pub mod remnants;
pub mod request_log;
