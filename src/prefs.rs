//! Durable filter preferences with a live change feed.
//!
//! The two list settings (sort order, hide-completed) persist in the
//! `preferences` key-value table and are republished on a watch channel so
//! the query layer and any menu UI see updates without re-reading the
//! database. A preference that fails to read or parse degrades to its
//! default; only writes surface errors.

use crate::error::{Result, StoreError};
use crate::sql_constants::{SELECT_PREFERENCE, UPSERT_PREFERENCE};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

pub const SORT_ORDER_KEY: &str = "sort_order";
pub const HIDE_COMPLETED_KEY: &str = "hide_completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    ByName,
    #[default]
    ByDate,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::ByName => "BY_NAME",
            SortOrder::ByDate => "BY_DATE",
        }
    }
}

impl FromStr for SortOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "BY_NAME" => Ok(SortOrder::ByName),
            "BY_DATE" => Ok(SortOrder::ByDate),
            other => Err(StoreError::InvalidInput(format!(
                "unknown sort order: {other}"
            ))),
        }
    }
}

/// The pair controlling list composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterPreferences {
    pub sort_order: SortOrder,
    pub hide_completed: bool,
}

#[derive(Clone)]
pub struct PreferencesManager {
    pool: SqlitePool,
    current: Arc<watch::Sender<FilterPreferences>>,
}

impl PreferencesManager {
    /// Read the persisted preferences once and start the live feed.
    ///
    /// A failed read is not fatal: the feed starts from defaults and the
    /// failure is only logged.
    pub async fn open(pool: SqlitePool) -> Self {
        let initial = match Self::load(&pool).await {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read preferences, using defaults");
                FilterPreferences::default()
            }
        };
        let (tx, _) = watch::channel(initial);
        Self {
            pool,
            current: Arc::new(tx),
        }
    }

    async fn load(pool: &SqlitePool) -> Result<FilterPreferences> {
        let sort_order = match read_value(pool, SORT_ORDER_KEY).await? {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "malformed sort order, using default");
                SortOrder::default()
            }),
            None => SortOrder::default(),
        };

        let hide_completed = match read_value(pool, HIDE_COMPLETED_KEY).await? {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "malformed hide-completed flag, using default");
                false
            }),
            None => false,
        };

        Ok(FilterPreferences {
            sort_order,
            hide_completed,
        })
    }

    /// Live pair for the query layer and menu-state reflection.
    pub fn filter_preferences(&self) -> watch::Receiver<FilterPreferences> {
        self.current.subscribe()
    }

    pub fn current(&self) -> FilterPreferences {
        *self.current.borrow()
    }

    /// Persist a new sort order, then publish it. Write failures propagate.
    pub async fn update_sort_order(&self, sort_order: SortOrder) -> Result<()> {
        write_value(&self.pool, SORT_ORDER_KEY, sort_order.as_str()).await?;
        self.current.send_if_modified(|prefs| {
            if prefs.sort_order != sort_order {
                prefs.sort_order = sort_order;
                true
            } else {
                false
            }
        });
        Ok(())
    }

    /// Persist the hide-completed flag, then publish it. Write failures propagate.
    pub async fn update_hide_completed(&self, hide_completed: bool) -> Result<()> {
        write_value(
            &self.pool,
            HIDE_COMPLETED_KEY,
            if hide_completed { "true" } else { "false" },
        )
        .await?;
        self.current.send_if_modified(|prefs| {
            if prefs.hide_completed != hide_completed {
                prefs.hide_completed = hide_completed;
                true
            } else {
                false
            }
        });
        Ok(())
    }
}

async fn read_value(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value = sqlx::query_scalar(SELECT_PREFERENCE)
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

async fn write_value(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(UPSERT_PREFERENCE)
        .bind(key)
        .bind(value)
        .execute(pool)
        .await?;
    Ok(())
}
