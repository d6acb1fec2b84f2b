//! Conjunctive task filter compiled to SQL.

/// Independently optional predicates over the task list.
///
/// Every `Some` field narrows the result; all predicates are ANDed and a
/// default filter matches every task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Exact status match
    pub status_id: Option<i64>,
    /// Exact executor match
    pub executor_id: Option<i64>,
    /// Task carries this label
    pub label_id: Option<i64>,
    /// Task was created by this user
    pub author_id: Option<i64>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status_id: i64) -> Self {
        self.status_id = Some(status_id);
        self
    }

    pub fn with_executor(mut self, executor_id: i64) -> Self {
        self.executor_id = Some(executor_id);
        self
    }

    pub fn with_label(mut self, label_id: i64) -> Self {
        self.label_id = Some(label_id);
        self
    }

    pub fn with_author(mut self, author_id: i64) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// Build the `WHERE` clause for a query aliasing `tasks` as `t`.
    ///
    /// Returns the SQL fragment (with a leading space) and its positional
    /// parameters in order.
    pub(crate) fn where_clause(&self) -> (String, Vec<i64>) {
        let mut sql = String::from(" WHERE 1=1");
        let mut params = Vec::new();

        if let Some(id) = self.status_id {
            sql.push_str(" AND t.status_id = ?");
            params.push(id);
        }
        if let Some(id) = self.executor_id {
            sql.push_str(" AND t.executor_id = ?");
            params.push(id);
        }
        if let Some(id) = self.label_id {
            // EXISTS keeps a task from appearing once per matching join row
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM task_labels tl \
                 WHERE tl.task_id = t.id AND tl.label_id = ?)",
            );
            params.push(id);
        }
        if let Some(id) = self.author_id {
            sql.push_str(" AND t.created_by = ?");
            params.push(id);
        }

        (sql, params)
    }
}
