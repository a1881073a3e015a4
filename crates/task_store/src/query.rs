//! Query specification for task listings.

use entities::TaskStatus;

/// Field a task listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOrderField {
    CreatedAt,
    UpdatedAt,
    Status,
    Title,
}

impl TaskOrderField {
    /// Column name used by the SQL backend.
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Status => "status",
            Self::Title => "title",
        }
    }

    /// Parses an API field name.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created_at" => Some(Self::CreatedAt),
            "updated_at" => Some(Self::UpdatedAt),
            "status" => Some(Self::Status),
            "title" => Some(Self::Title),
            _ => None,
        }
    }
}

/// Ordering applied to a task listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskOrder {
    pub field: TaskOrderField,
    pub descending: bool,
}

impl Default for TaskOrder {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: TaskOrderField::CreatedAt,
            descending: true,
        }
    }
}

impl TaskOrder {
    /// Parses a Django-style ordering expression: a field name with an
    /// optional leading `-` for descending. Unknown fields yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let (descending, field) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        TaskOrderField::parse(field).map(|field| Self { field, descending })
    }
}

/// Filter, ordering, and pagination for a task listing.
///
/// Page numbers are 1-based; `page_size` is expected to be already capped
/// by the caller.
#[derive(Debug, Clone)]
pub struct TaskQuery {
    /// Status equality filter.
    pub status: Option<TaskStatus>,
    /// Case-insensitive substring filter over title and description.
    pub search: Option<String>,
    /// Restrict to one owner's tasks.
    pub user_id: Option<i64>,
    /// Result ordering.
    pub order: TaskOrder,
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            status: None,
            search: None,
            user_id: None,
            order: TaskOrder::default(),
            page: 1,
            page_size: 10,
        }
    }
}

impl TaskQuery {
    /// Row offset for the SQL backend.
    pub fn offset(&self) -> u64 {
        (self.page.max(1) as u64 - 1) * self.page_size as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_parse() {
        let order = TaskOrder::parse("-created_at").unwrap();
        assert_eq!(order.field, TaskOrderField::CreatedAt);
        assert!(order.descending);

        let order = TaskOrder::parse("title").unwrap();
        assert_eq!(order.field, TaskOrderField::Title);
        assert!(!order.descending);

        assert!(TaskOrder::parse("owner").is_none());
        assert!(TaskOrder::parse("-id").is_none());
    }

    #[test]
    fn test_offset() {
        let query = TaskQuery {
            page: 3,
            page_size: 10,
            ..TaskQuery::default()
        };
        assert_eq!(query.offset(), 20);

        let query = TaskQuery::default();
        assert_eq!(query.offset(), 0);
    }
}
