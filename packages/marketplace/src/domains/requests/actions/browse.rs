use tracing::debug;

use crate::domains::requests::models::{Request, RequestFilter};
use crate::error::{MarketError, Result};
use crate::kernel::MarketDeps;

/// Public feed, newest first, narrowed by `filter`.
pub async fn browse_requests(filter: &RequestFilter, deps: &MarketDeps) -> Result<Vec<Request>> {
    let all = deps
        .requests
        .list()
        .await
        .map_err(|e| MarketError::gateway("Не удалось загрузить запросы", &e))?;

    let total = all.len();
    let shown = filter.apply(all);
    debug!(
        "Feed: {} of {} requests match {:?}",
        shown.len(),
        total,
        filter
    );
    Ok(shown)
}
