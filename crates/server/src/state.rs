use std::sync::Arc;

use common::media::MediaUploader;
use service::cache::PageCache;
use service::marketplace::repository::MarketplaceRepository;
use service::MarketplaceService;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub marketplace: MarketplaceService,
    pub pages: PageCache,
    pub media: Arc<dyn MediaUploader>,
}

impl AppState {
    /// Wire the marketplace service to the same page cache the read routes use.
    pub fn new(repo: Arc<dyn MarketplaceRepository>, pages: PageCache, media: Arc<dyn MediaUploader>) -> Self {
        let marketplace = MarketplaceService::new(repo, Arc::new(pages.clone()));
        Self { marketplace, pages, media }
    }
}
