use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::AppError;
use crate::model::reset_marker::{LAST_RESET_KEY, marker_for};
use crate::model::staff::StaffRecord;
use crate::store::StaffStore;

/// Owns the "who is checked in today" flags across all staff records.
#[derive(Clone)]
pub struct PresenceTracker {
    store: StaffStore,
}

impl PresenceTracker {
    pub fn new(store: StaffStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StaffStore {
        &self.store
    }

    /// Replaces the whole checked-in membership with `ids` and returns the
    /// resulting count. Unknown and repeated ids are ignored.
    pub async fn set_checked_in_set<I>(&self, ids: I) -> Result<i64, AppError>
    where
        I: IntoIterator<Item = i64>,
    {
        let ids: Vec<i64> = ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        debug!(requested = ids.len(), "Replacing checked-in set");

        self.store.replace_checked_in(&ids).await?;
        Ok(self.store.count_checked_in().await?)
    }

    pub async fn set_individual(&self, id: i64, checked_in: bool) -> Result<(), AppError> {
        if self.store.set_checked_in(id, checked_in).await? == 0 {
            return Err(AppError::NotFound(id));
        }

        debug!(id, checked_in, "Checked-in flag updated");
        Ok(())
    }

    pub async fn count_checked_in(&self) -> Result<i64, AppError> {
        Ok(self.store.count_checked_in().await?)
    }

    /// Snapshot of checked-in records, newest id first.
    pub async fn list_checked_in(&self) -> Result<Vec<StaffRecord>, AppError> {
        Ok(self.store.list_checked_in().await?)
    }

    /// Clears every flag when the UTC day of `now` differs from the stored
    /// marker, then records the new day. Returns whether a reset happened.
    pub async fn reset_if_new_day(&self, now: DateTime<Utc>) -> Result<bool, AppError> {
        let today = marker_for(now);
        let last = self.store.get_meta(LAST_RESET_KEY).await?;

        if last.as_deref() == Some(today.as_str()) {
            return Ok(false);
        }

        self.set_checked_in_set(std::iter::empty()).await?;
        self.store.set_meta(LAST_RESET_KEY, &today).await?;

        info!(date = %today, previous = ?last, "Check-ins cleared for new day");
        Ok(true)
    }
}
