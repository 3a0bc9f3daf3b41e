//! View controllers for the task list and its edit screens.
//!
//! Controllers translate user intents into store calls and hand the
//! presentation layer two kinds of output: live feeds (the composed task
//! list, the filter-preference pair) that always reflect current state, and
//! one-shot events (navigate, confirm, error) that are delivered exactly
//! once to exactly one listener. Events ride an unbounded ordered queue:
//! they buffer until the single consumer attaches and are never replayed.
//!
//! No controller method blocks or returns a persistence result. Mutations
//! run on detached tasks, so they complete even if the screen that issued
//! them is torn down; their outcome shows up through the live list or as an
//! event.

use crate::db::models::Task;
use crate::prefs::{FilterPreferences, PreferencesManager, SortOrder};
use crate::query;
use crate::state::SavedState;
use crate::store::TaskStore;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

pub const SEARCH_QUERY_KEY: &str = "search_query";
const TASK_KEY: &str = "task";
const TASK_NAME_KEY: &str = "task_name";
const TASK_IMPORTANCE_KEY: &str = "task_importance";

/// Outcome flag the edit screen reports back to the list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddEditResult {
    Added,
    Edited,
}

/// One-shot events from the list screen. Consumers are expected to match
/// exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskListEvent {
    ShowUndoDeleteTaskMessage(Task),
    NavigateToAddTaskScreen,
    NavigateToEditTaskScreen(Task),
    ShowTaskSavedConfirmationMessage(String),
    NavigateToDeleteAllCompletedScreen,
    ShowStorageErrorMessage(String),
}

pub struct TaskListController {
    store: TaskStore,
    prefs: PreferencesManager,
    state: SavedState,
    search: Arc<watch::Sender<String>>,
    tasks: watch::Receiver<Vec<Task>>,
    events: mpsc::UnboundedSender<TaskListEvent>,
    pending_events: Mutex<Option<mpsc::UnboundedReceiver<TaskListEvent>>>,
    composer: JoinHandle<()>,
}

impl TaskListController {
    pub fn new(store: TaskStore, prefs: PreferencesManager, state: SavedState) -> Self {
        let initial_query: String = state.get(SEARCH_QUERY_KEY).unwrap_or_default();
        let (search_tx, search_rx) = watch::channel(initial_query);
        let (tasks, composer) =
            query::observe_tasks(store.clone(), search_rx, prefs.filter_preferences());
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            store,
            prefs,
            state,
            search: Arc::new(search_tx),
            tasks,
            events: events_tx,
            pending_events: Mutex::new(Some(events_rx)),
            composer,
        }
    }

    /// The composed live list, ready for direct rendering.
    pub fn tasks(&self) -> watch::Receiver<Vec<Task>> {
        self.tasks.clone()
    }

    /// Live sort/hide pair for menu-state reflection.
    pub fn filter_preferences(&self) -> watch::Receiver<FilterPreferences> {
        self.prefs.filter_preferences()
    }

    pub fn search_query(&self) -> String {
        self.search.borrow().clone()
    }

    /// Claim the event queue. There is exactly one consumer; later calls get
    /// `None`. Events fired before this point are waiting in the queue.
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<TaskListEvent>> {
        self.pending_events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    /// Update the pending search text. Checkpointed so it survives a
    /// presentation reload.
    pub fn set_search_query(&self, query: &str) {
        self.state.put(SEARCH_QUERY_KEY, query);
        self.search.send_if_modified(|current| {
            if current.as_str() != query {
                *current = query.to_string();
                true
            } else {
                false
            }
        });
    }

    pub fn task_selected(&self, task: Task) {
        let _ = self.events.send(TaskListEvent::NavigateToEditTaskScreen(task));
    }

    pub fn task_checked_changed(&self, task: &Task, is_checked: bool) {
        let store = self.store.clone();
        let events = self.events.clone();
        let updated = task.with_completed(is_checked);
        tokio::spawn(async move {
            if let Err(e) = store.update(&updated).await {
                let _ = events.send(TaskListEvent::ShowStorageErrorMessage(e.to_string()));
            }
        });
    }

    /// Swipe-to-delete: remove the record, then offer undo while this
    /// controller still holds the full value.
    pub fn task_swiped(&self, task: Task) {
        let store = self.store.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            match store.delete(&task).await {
                Ok(()) => {
                    let _ = events.send(TaskListEvent::ShowUndoDeleteTaskMessage(task));
                }
                Err(e) => {
                    let _ = events.send(TaskListEvent::ShowStorageErrorMessage(e.to_string()));
                }
            }
        });
    }

    /// Undo a swipe: re-insert the held record, original id and creation
    /// time intact.
    pub fn undo_delete_clicked(&self, task: Task) {
        let store = self.store.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            if let Err(e) = store.insert(&task).await {
                let _ = events.send(TaskListEvent::ShowStorageErrorMessage(e.to_string()));
            }
        });
    }

    pub fn add_new_task_clicked(&self) {
        let _ = self.events.send(TaskListEvent::NavigateToAddTaskScreen);
    }

    pub fn add_edit_result(&self, result: AddEditResult) {
        let message = match result {
            AddEditResult::Added => "Task added",
            AddEditResult::Edited => "Task updated",
        };
        let _ = self
            .events
            .send(TaskListEvent::ShowTaskSavedConfirmationMessage(
                message.to_string(),
            ));
    }

    pub fn sort_order_selected(&self, sort_order: SortOrder) {
        let prefs = self.prefs.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            if let Err(e) = prefs.update_sort_order(sort_order).await {
                let _ = events.send(TaskListEvent::ShowStorageErrorMessage(e.to_string()));
            }
        });
    }

    pub fn hide_completed_clicked(&self, hide_completed: bool) {
        let prefs = self.prefs.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            if let Err(e) = prefs.update_hide_completed(hide_completed).await {
                let _ = events.send(TaskListEvent::ShowStorageErrorMessage(e.to_string()));
            }
        });
    }

    pub fn delete_all_completed_clicked(&self) {
        let _ = self
            .events
            .send(TaskListEvent::NavigateToDeleteAllCompletedScreen);
    }
}

impl Drop for TaskListController {
    fn drop(&mut self) {
        // Releases the live-query subscription. Mutations already submitted
        // run on detached tasks and still complete.
        self.composer.abort();
    }
}

/// One-shot events from the add/edit screen.
#[derive(Debug, Clone, PartialEq)]
pub enum AddEditTaskEvent {
    ShowInvalidInputMessage(String),
    NavigateBackWithResult(AddEditResult),
    ShowStorageErrorMessage(String),
}

pub struct AddEditTaskController {
    store: TaskStore,
    state: SavedState,
    task: Option<Task>,
    events: mpsc::UnboundedSender<AddEditTaskEvent>,
    pending_events: Mutex<Option<mpsc::UnboundedReceiver<AddEditTaskEvent>>>,
}

impl AddEditTaskController {
    /// Blank add form, or — when the state bag carries a record from
    /// [`Self::for_task`] — an edit form for it.
    pub fn new(store: TaskStore, state: SavedState) -> Self {
        let task = state.get::<Task>(TASK_KEY);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            store,
            state,
            task,
            events: events_tx,
            pending_events: Mutex::new(Some(events_rx)),
        }
    }

    /// Edit form for an existing record. The record goes into the state bag
    /// so reconstruction after a reload still edits the same task.
    pub fn for_task(store: TaskStore, state: SavedState, task: Task) -> Self {
        state.put(TASK_KEY, &task);
        Self::new(store, state)
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    /// Pending name: an in-progress edit wins over the stored record, which
    /// wins over blank.
    pub fn task_name(&self) -> String {
        self.state
            .get(TASK_NAME_KEY)
            .or_else(|| self.task.as_ref().map(|t| t.name.clone()))
            .unwrap_or_default()
    }

    pub fn set_task_name(&self, name: &str) {
        self.state.put(TASK_NAME_KEY, name);
    }

    pub fn task_importance(&self) -> bool {
        self.state
            .get(TASK_IMPORTANCE_KEY)
            .or_else(|| self.task.as_ref().map(|t| t.is_important))
            .unwrap_or(false)
    }

    pub fn set_task_importance(&self, is_important: bool) {
        self.state.put(TASK_IMPORTANCE_KEY, is_important);
    }

    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<AddEditTaskEvent>> {
        self.pending_events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
    }

    /// Validate and persist. A blank name fires one invalid-input event and
    /// touches nothing; otherwise the record is updated (edit) or inserted
    /// (add) and the matching result event follows.
    pub fn save_clicked(&self) {
        let name = self.task_name();
        if name.trim().is_empty() {
            let _ = self.events.send(AddEditTaskEvent::ShowInvalidInputMessage(
                "Name cannot be empty".to_string(),
            ));
            return;
        }

        let is_important = self.task_importance();
        let store = self.store.clone();
        let events = self.events.clone();

        match self.task.clone() {
            Some(existing) => {
                let updated = existing.with_details(name, is_important);
                tokio::spawn(async move {
                    match store.update(&updated).await {
                        Ok(()) => {
                            let _ = events.send(AddEditTaskEvent::NavigateBackWithResult(
                                AddEditResult::Edited,
                            ));
                        }
                        Err(e) => {
                            let _ = events
                                .send(AddEditTaskEvent::ShowStorageErrorMessage(e.to_string()));
                        }
                    }
                });
            }
            None => {
                let new_task = Task::new(name, is_important);
                tokio::spawn(async move {
                    match store.insert(&new_task).await {
                        Ok(_) => {
                            let _ = events.send(AddEditTaskEvent::NavigateBackWithResult(
                                AddEditResult::Added,
                            ));
                        }
                        Err(e) => {
                            let _ = events
                                .send(AddEditTaskEvent::ShowStorageErrorMessage(e.to_string()));
                        }
                    }
                });
            }
        }
    }
}

/// Confirmation dialog for the bulk sweep of completed tasks.
pub struct DeleteAllCompletedController {
    store: TaskStore,
}

impl DeleteAllCompletedController {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// Runs on a detached task: the dialog dismisses immediately and its
    /// teardown must not cancel the delete mid-flight.
    pub fn confirm_clicked(&self) {
        let store = self.store.clone();
        tokio::spawn(async move {
            match store.delete_completed().await {
                Ok(removed) => tracing::debug!(removed, "completed tasks cleared"),
                Err(e) => tracing::error!(error = %e, "failed to clear completed tasks"),
            }
        });
    }
}
