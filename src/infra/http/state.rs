use std::sync::Arc;

use crate::application::catalog::CatalogService;
use crate::application::metrics::ServiceMetrics;
use crate::cache::CacheAdapter;

#[derive(Clone)]
pub struct HttpState {
    pub catalog: Arc<CatalogService>,
    pub metrics: Arc<ServiceMetrics>,
    pub cache: CacheAdapter,
    /// Expose internal error detail in 500 bodies.
    pub debug: bool,
}
