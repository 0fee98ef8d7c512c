pub mod batch;
pub mod codes;
pub mod export;
pub mod fetcher;

pub use crate::domain::model::{BatchRequest, BatchResponse, LookupOutcome, LookupResult};
pub use crate::domain::ports::{ConfigProvider, PriceLookup, Storage};
pub use crate::utils::error::Result;
