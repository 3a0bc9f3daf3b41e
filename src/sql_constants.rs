//! SQL query constants and fragments
//!
//! Centralizes the query text used by the task store. The two list queries
//! are deliberately separate constants rather than one statement with an
//! interpolated ORDER BY column: splicing a column name at runtime would
//! defeat static validation of the query shape, so the sort order selects
//! between two fixed statements instead.

/// Standard column list for task queries
///
/// Columns: id, name, is_important, is_completed, created_at
pub const TASK_COLUMNS: &str = "id, name, is_important, is_completed, created_at";

/// Visibility and search filter shared by both list queries.
///
/// `?1` is the hide-completed flag, `?2` the search text. Completed rows are
/// suppressed only when `?1` is set; incomplete rows always pass. The search
/// match uses `instr` because SQLite's `LIKE` folds ASCII case and the list
/// contract is a case-sensitive substring match.
const TASK_LIST_FILTER: &str =
    "(is_completed != ?1 OR is_completed = 0) AND (?2 = '' OR instr(name, ?2) > 0)";

/// List query, importance first then name
pub const SELECT_TASKS_BY_NAME: &str = const_format::formatcp!(
    "SELECT {} FROM tasks WHERE {} ORDER BY is_important DESC, name ASC",
    TASK_COLUMNS,
    TASK_LIST_FILTER
);

/// List query, importance first then creation time
pub const SELECT_TASKS_BY_DATE: &str = const_format::formatcp!(
    "SELECT {} FROM tasks WHERE {} ORDER BY is_important DESC, created_at ASC",
    TASK_COLUMNS,
    TASK_LIST_FILTER
);

/// Fetch a single task by id
pub const SELECT_TASK_BY_ID: &str =
    const_format::formatcp!("SELECT {} FROM tasks WHERE id = ?", TASK_COLUMNS);

/// Insert with a store-assigned id
pub const INSERT_TASK: &str =
    "INSERT INTO tasks (name, is_important, is_completed, created_at) VALUES (?, ?, ?, ?)";

/// Insert keyed on an explicit id, replacing any existing row (undo-restore path)
pub const UPSERT_TASK: &str =
    "INSERT OR REPLACE INTO tasks (id, name, is_important, is_completed, created_at) VALUES (?, ?, ?, ?, ?)";

/// Full-row replacement of an existing task
pub const UPDATE_TASK: &str =
    "UPDATE tasks SET name = ?1, is_important = ?2, is_completed = ?3, created_at = ?4 WHERE id = ?5";

/// Delete by id (no error when the row is already gone)
pub const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?";

/// Bulk delete of every completed task
pub const DELETE_COMPLETED: &str = "DELETE FROM tasks WHERE is_completed = 1";

/// Count all tasks
pub const COUNT_TASKS_TOTAL: &str = "SELECT COUNT(*) FROM tasks";

// ============================================================================
// Preference Queries
// ============================================================================

/// Read a single preference value
pub const SELECT_PREFERENCE: &str = "SELECT value FROM preferences WHERE key = ?";

/// Write a preference value, replacing any prior one
pub const UPSERT_PREFERENCE: &str =
    "INSERT INTO preferences (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_columns_format() {
        assert!(TASK_COLUMNS.contains("id"));
        assert!(TASK_COLUMNS.contains("name"));
        assert!(TASK_COLUMNS.contains("is_important"));
        assert!(TASK_COLUMNS.contains("created_at"));
    }

    #[test]
    fn test_list_queries_are_static_shapes() {
        // One shape per sort order, same filter, different ORDER BY column.
        assert!(SELECT_TASKS_BY_NAME.ends_with("ORDER BY is_important DESC, name ASC"));
        assert!(SELECT_TASKS_BY_DATE.ends_with("ORDER BY is_important DESC, created_at ASC"));
        assert!(SELECT_TASKS_BY_NAME.contains("instr(name, ?2)"));
        assert!(SELECT_TASKS_BY_DATE.contains("instr(name, ?2)"));
    }

    #[test]
    fn test_select_task_by_id() {
        assert_eq!(
            SELECT_TASK_BY_ID,
            "SELECT id, name, is_important, is_completed, created_at FROM tasks WHERE id = ?"
        );
    }

    #[test]
    fn test_delete_completed_targets_completed_only() {
        assert_eq!(DELETE_COMPLETED, "DELETE FROM tasks WHERE is_completed = 1");
    }
}
