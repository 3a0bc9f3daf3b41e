//! The query composer.
//!
//! Folds three independently-changing inputs — search text, filter
//! preferences, and the store's data version — into one live, ordered task
//! list. Combination is switch-to-latest: the moment any input moves, an
//! in-flight fetch is abandoned and a fresh one starts from the latest
//! inputs, so two query generations can never interleave downstream.

use crate::db::models::Task;
use crate::prefs::FilterPreferences;
use crate::store::TaskStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Spawn the composer and hand back its output feed.
///
/// The returned receiver always holds the latest full result (starting
/// empty until the first fetch lands). The composer task ends when any
/// input channel closes or the handle is aborted; dropping the handle does
/// not stop it.
pub fn observe_tasks(
    store: TaskStore,
    mut search: watch::Receiver<String>,
    mut prefs: watch::Receiver<FilterPreferences>,
) -> (watch::Receiver<Vec<Task>>, JoinHandle<()>) {
    let (results_tx, results_rx) = watch::channel(Vec::new());
    let mut data = store.subscribe();

    let handle = tokio::spawn(async move {
        // Last inputs a fetch completed for; re-combination with identical
        // inputs is skipped rather than re-issued.
        let mut last_issued: Option<(String, FilterPreferences, u64)> = None;

        loop {
            let query = search.borrow_and_update().clone();
            let current = *prefs.borrow_and_update();
            let version = *data.borrow_and_update();
            let issued = (query.clone(), current, version);

            if last_issued.as_ref() != Some(&issued) {
                tokio::select! {
                    fetched = store.tasks(&query, current.sort_order, current.hide_completed) => {
                        match fetched {
                            Ok(tasks) => {
                                if results_tx.send(tasks).is_err() {
                                    return;
                                }
                            }
                            // Keep the previous result current; the next
                            // input change retries.
                            Err(e) => tracing::warn!(error = %e, "live task query failed"),
                        }
                        last_issued = Some(issued);
                    }
                    changed = input_changed(&mut search, &mut prefs, &mut data) => {
                        if !changed {
                            return;
                        }
                        // Superseded mid-fetch: restart from the latest inputs.
                        continue;
                    }
                }
            }

            if !input_changed(&mut search, &mut prefs, &mut data).await {
                return;
            }
        }
    });

    (results_rx, handle)
}

/// Wait until any input source publishes. Returns false once a source has
/// closed, which is the composer's teardown signal.
async fn input_changed(
    search: &mut watch::Receiver<String>,
    prefs: &mut watch::Receiver<FilterPreferences>,
    data: &mut watch::Receiver<u64>,
) -> bool {
    tokio::select! {
        changed = search.changed() => changed.is_ok(),
        changed = prefs.changed() => changed.is_ok(),
        changed = data.changed() => changed.is_ok(),
    }
}
