use std::sync::Arc;

use tracing::debug;

use crate::db::TaskStore;
use crate::error::AppError;
use crate::models::{Cursor, Page, PageInfo, PageRequest};

/// Keyset pagination over an owner's tasks.
///
/// Each call issues one count and one bounded scan and keeps nothing between
/// calls. The scan predicate is relative to the cursor's `(created_at, id)`,
/// never to a row offset, so concurrent inserts and deletes cannot make a
/// traversal repeat or skip a task that was present throughout.
#[derive(Clone)]
pub struct TaskPager {
    store: Arc<dyn TaskStore>,
}

impl TaskPager {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn paginate(&self, request: &PageRequest) -> Result<Page, AppError> {
        let page_size = request.page_size.get();

        let total_count = self.store.count(&request.owner_id).await?;
        if total_count == 0 {
            debug!(owner_id = %request.owner_id, "no tasks, returning empty page");
            return Ok(Page::empty());
        }

        // One extra row tells us whether another page exists.
        let mut nodes = self
            .store
            .scan(
                &request.owner_id,
                request.cursor.as_ref(),
                request.order,
                page_size.saturating_add(1),
            )
            .await?;

        debug_assert!(
            nodes
                .windows(2)
                .all(|pair| request.order.compare(&pair[0], &pair[1]).is_lt()),
            "store returned tasks out of order"
        );

        let page_len = usize::try_from(page_size).unwrap_or(usize::MAX);
        let has_next_page = nodes.len() > page_len;
        nodes.truncate(page_len);

        let next_cursor = nodes.last().map(Cursor::from);
        let total_pages = total_count.div_ceil(u64::from(page_size));

        debug!(
            owner_id = %request.owner_id,
            returned = nodes.len(),
            has_next_page,
            total_count,
            "page built"
        );

        Ok(Page {
            nodes,
            page_info: PageInfo {
                has_next_page,
                next_cursor,
                total_pages,
            },
            total_count,
        })
    }
}
