//! Marketplace actions: three-layer architecture (repository, repo impls, service).
//!
//! Providers own an ordered list of services; every action reports a missing
//! target or a conflict through `ActionOutcome` instead of silently succeeding.

pub mod repository;
pub mod repo;
pub mod service;

pub use repository::MarketplaceRepository;
pub use service::MarketplaceService;
