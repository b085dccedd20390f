pub mod aggregate;

pub use aggregate::{RemnantQuantity, StockRecord};
