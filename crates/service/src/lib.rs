//! Service layer for the marketplace.
//! - Business actions over providers and services, independent of the web framework.
//! - Persistence behind `MarketplaceRepository`, with a SeaORM implementation and an in-memory mock.
//! - Collaborators: page cache invalidation and local media storage.

pub mod errors;
pub mod marketplace;
pub mod cache;
pub mod media;
#[cfg(test)]
pub mod test_support;

pub use marketplace::MarketplaceService;
