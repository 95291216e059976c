//! Keyset pagination types shared by the pager, the store and the HTTP layer.

use std::cmp::Ordering;
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Task;

pub const DEFAULT_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(10).unwrap();
pub const MAX_PAGE_SIZE: NonZeroU32 = NonZeroU32::new(100).unwrap();

/// Position of the last task a client has seen.
///
/// A cursor is a value, not an offset: it stays meaningful when tasks before
/// it are deleted and it never has to name a task that still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Task> for Cursor {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            created_at: task.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Orders two tasks by `(created_at, id)` in this direction.
    ///
    /// Ids are unique, so two distinct tasks never compare equal.
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        let natural = a
            .created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id));
        match self {
            SortOrder::Asc => natural,
            SortOrder::Desc => natural.reverse(),
        }
    }

    /// Whether `task` lies strictly after `cursor` when walking in this direction.
    pub fn is_after(self, task: &Task, cursor: &Cursor) -> bool {
        let natural = task
            .created_at
            .cmp(&cursor.created_at)
            .then_with(|| task.id.as_str().cmp(cursor.id.as_str()));
        match self {
            SortOrder::Asc => natural == Ordering::Greater,
            SortOrder::Desc => natural == Ordering::Less,
        }
    }

    pub(crate) fn sql_direction(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    pub(crate) fn sql_comparison(self) -> &'static str {
        match self {
            SortOrder::Asc => ">",
            SortOrder::Desc => "<",
        }
    }
}

/// A validated request for one page of an owner's tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub owner_id: String,
    pub page_size: NonZeroU32,
    pub cursor: Option<Cursor>,
    pub order: SortOrder,
}

impl PageRequest {
    pub fn first(owner_id: impl Into<String>, page_size: NonZeroU32, order: SortOrder) -> Self {
        Self {
            owner_id: owner_id.into(),
            page_size,
            cursor: None,
            order,
        }
    }

    /// The request for the page that follows `page`, reusing size and order.
    pub fn next(&self, page: &Page) -> Option<Self> {
        if !page.page_info.has_next_page {
            return None;
        }
        Some(Self {
            cursor: page.page_info.next_cursor.clone(),
            ..self.clone()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub next_cursor: Option<Cursor>,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub nodes: Vec<Task>,
    pub page_info: PageInfo,
    pub total_count: u64,
}

impl Page {
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            page_info: PageInfo {
                has_next_page: false,
                next_cursor: None,
                total_pages: 0,
            },
            total_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn task(id: &str, secs: i64) -> Task {
        let at = Utc.timestamp_opt(secs, 0).unwrap();
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            completed: false,
            created_at: at,
            updated_at: at,
            owner_id: "owner".to_string(),
        }
    }

    #[test]
    fn test_compare_is_total_for_both_orders() {
        let tasks = [task("a", 1), task("b", 1), task("c", 2), task("0", 3)];

        for order in [SortOrder::Asc, SortOrder::Desc] {
            for (i, a) in tasks.iter().enumerate() {
                for (j, b) in tasks.iter().enumerate() {
                    let ab = order.compare(a, b);
                    let ba = order.compare(b, a);
                    if i == j {
                        assert_eq!(ab, Ordering::Equal);
                    } else {
                        assert_ne!(ab, Ordering::Equal, "{} vs {}", a.id, b.id);
                        assert_eq!(ab, ba.reverse());
                    }
                }
            }
        }
    }

    #[test]
    fn test_id_breaks_created_at_ties() {
        let a = task("a", 5);
        let b = task("b", 5);

        assert_eq!(SortOrder::Asc.compare(&a, &b), Ordering::Less);
        assert_eq!(SortOrder::Desc.compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn test_is_after_follows_direction() {
        let cursor = Cursor::from(&task("b", 5));

        assert!(SortOrder::Asc.is_after(&task("c", 5), &cursor));
        assert!(SortOrder::Asc.is_after(&task("a", 6), &cursor));
        assert!(!SortOrder::Asc.is_after(&task("b", 5), &cursor));
        assert!(!SortOrder::Asc.is_after(&task("z", 4), &cursor));

        assert!(SortOrder::Desc.is_after(&task("a", 5), &cursor));
        assert!(SortOrder::Desc.is_after(&task("z", 4), &cursor));
        assert!(!SortOrder::Desc.is_after(&task("b", 5), &cursor));
        assert!(!SortOrder::Desc.is_after(&task("c", 5), &cursor));
    }

    #[test]
    fn test_sort_order_wire_names() {
        assert_eq!(serde_json::to_string(&SortOrder::Desc).unwrap(), "\"desc\"");
        let parsed: SortOrder = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(parsed, SortOrder::Asc);
    }

    #[test]
    fn test_empty_page_shape() {
        let json = serde_json::to_value(Page::empty()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "nodes": [],
                "pageInfo": { "hasNextPage": false, "nextCursor": null, "totalPages": 0 },
                "totalCount": 0
            })
        );
    }
}
