//! Command handlers for the `td` binary.
//!
//! One-shot commands go straight at the store and preference manager; the
//! `watch` command builds a full list controller and follows its live feed.

use crate::controller::TaskListController;
use crate::db::models::Task;
use crate::error::{Result, StoreError};
use crate::prefs::{PreferencesManager, SortOrder};
use crate::state::SavedState;
use crate::store::TaskStore;

pub async fn handle_add(store: &TaskStore, name: &str, important: bool) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidInput(
            "task name must not be blank".to_string(),
        ));
    }

    let task = store.insert(&Task::new(name, important)).await?;
    println!("Added task {}: {}", task.id, task.name);
    Ok(())
}

pub async fn handle_list(
    store: &TaskStore,
    prefs: &PreferencesManager,
    search: &str,
    format: &str,
) -> Result<()> {
    let current = prefs.current();
    let tasks = store
        .tasks(search, current.sort_order, current.hide_completed)
        .await?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        render_tasks(&tasks);
    }
    Ok(())
}

pub async fn handle_done(store: &TaskStore, id: i64, completed: bool) -> Result<()> {
    let task = store.get(id).await?;
    store.update(&task.with_completed(completed)).await?;
    let verb = if completed { "Completed" } else { "Reopened" };
    println!("{} task {}: {}", verb, task.id, task.name);
    Ok(())
}

pub async fn handle_rm(store: &TaskStore, id: i64) -> Result<()> {
    store.delete_by_id(id).await?;
    println!("Deleted task {id}");
    Ok(())
}

pub async fn handle_clear_completed(store: &TaskStore) -> Result<()> {
    let removed = store.delete_completed().await?;
    println!("Removed {removed} completed task(s)");
    Ok(())
}

pub async fn handle_sort(prefs: &PreferencesManager, order: SortOrder) -> Result<()> {
    prefs.update_sort_order(order).await?;
    println!("Sort order set to {}", order.as_str());
    Ok(())
}

pub async fn handle_hide_completed(prefs: &PreferencesManager, hidden: bool) -> Result<()> {
    prefs.update_hide_completed(hidden).await?;
    println!(
        "Completed tasks are now {}",
        if hidden { "hidden" } else { "shown" }
    );
    Ok(())
}

pub async fn handle_seed(store: &TaskStore) -> Result<()> {
    if store.seed_sample_tasks().await? {
        println!("Seeded sample tasks");
    } else {
        println!("Sample tasks were already seeded");
    }
    Ok(())
}

/// Follow the live list until Ctrl-C. This is the reactive path end to end:
/// controller, query composer, and data-version feed.
pub async fn handle_watch(store: TaskStore, prefs: PreferencesManager, search: &str) -> Result<()> {
    let controller = TaskListController::new(store, prefs, SavedState::new());
    controller.set_search_query(search);
    let mut tasks = controller.tasks();

    loop {
        {
            let current = tasks.borrow_and_update();
            println!("\x1B[2J\x1B[H-- {} task(s), Ctrl-C to stop --", current.len());
            render_tasks(&current);
        }

        tokio::select! {
            changed = tasks.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}

fn render_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks");
        return;
    }
    for task in tasks {
        println!(
            "{:>4}  [{}] {}{} ({})",
            task.id,
            if task.is_completed { "x" } else { " " },
            if task.is_important { "! " } else { "" },
            task.name,
            task.created_date_formatted(),
        );
    }
}
