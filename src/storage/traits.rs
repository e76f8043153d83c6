use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Matter, MatterId, TimeEntry, Timekeeper, TimekeeperId};
use crate::mapper::UtbmsOverride;

/// Storage trait for persistence operations.
#[async_trait]
pub trait Storage: Send + Sync {
    // Time entries
    /// Insert an entry unless one with the same (work_date,
    /// description) already exists. Returns whether a row was added.
    async fn insert_entry(&self, entry: &TimeEntry) -> anyhow::Result<bool>;
    async fn list_entries(&self) -> anyhow::Result<Vec<TimeEntry>>;
    async fn entries_between(
        &self,
        matter_id: &MatterId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<TimeEntry>>;

    // Matters
    async fn upsert_matter(&self, matter: &Matter) -> anyhow::Result<()>;
    async fn get_matter(&self, client_matter_id: &str) -> anyhow::Result<Option<Matter>>;

    // Timekeepers
    async fn upsert_timekeeper(&self, timekeeper: &Timekeeper) -> anyhow::Result<()>;
    async fn get_timekeeper(&self, id: &TimekeeperId) -> anyhow::Result<Option<Timekeeper>>;

    // UTBMS exact-phrase overrides
    async fn lookup_override(&self, phrase: &str) -> anyhow::Result<Option<UtbmsOverride>>;
    async fn upsert_override(&self, codes: &UtbmsOverride) -> anyhow::Result<()>;
}
