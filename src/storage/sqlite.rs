use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

use crate::domain::{
    ClientId, EntryId, Matter, MatterId, TimeEntry, Timekeeper, TimekeeperId, UtbmsCode,
};
use crate::mapper::UtbmsOverride;

use super::traits::Storage;

/// SQLite-backed storage.
///
/// Rates are stored as TEXT and parsed through `Decimal` so currency
/// never round-trips through floating point.
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Connect to a SQLite database URL (e.g. `sqlite:billr.db?mode=rwc`).
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
            .with_context(|| format!("connecting to {url}"))?;
        Ok(SqliteStorage { pool })
    }

    /// Single-connection in-memory database. A pooled `:memory:` URL
    /// would give each connection its own empty database, so the pool
    /// is capped at one connection.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(SqliteStorage { pool })
    }

    /// Create tables if they do not exist. Safe to call repeatedly.
    pub async fn init_schema(&self) -> anyhow::Result<()> {
        let statements = [
            r#"CREATE TABLE IF NOT EXISTS time_entries (
                id TEXT PRIMARY KEY,
                work_date TEXT,
                client_id TEXT,
                matter_id TEXT,
                timekeeper_id TEXT,
                duration_hours REAL NOT NULL,
                description TEXT NOT NULL,
                utbms_code TEXT,
                UNIQUE(work_date, description)
            )"#,
            r#"CREATE TABLE IF NOT EXISTS matters (
                client_matter_id TEXT PRIMARY KEY,
                client_id TEXT NOT NULL,
                law_firm_matter_id TEXT NOT NULL,
                law_firm_id TEXT NOT NULL,
                description TEXT
            )"#,
            r#"CREATE TABLE IF NOT EXISTS timekeepers (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                classification TEXT NOT NULL,
                rate TEXT NOT NULL
            )"#,
            r#"CREATE TABLE IF NOT EXISTS utbms_overrides (
                phrase TEXT PRIMARY KEY,
                task_code TEXT,
                activity_code TEXT
            )"#,
        ];

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn entry_from_row(row: &SqliteRow) -> anyhow::Result<TimeEntry> {
    Ok(TimeEntry {
        id: EntryId::from_string(row.try_get::<String, _>("id")?),
        work_date: row.try_get::<Option<NaiveDate>, _>("work_date")?,
        client_id: row
            .try_get::<Option<String>, _>("client_id")?
            .map(ClientId::new),
        matter_id: row
            .try_get::<Option<String>, _>("matter_id")?
            .map(MatterId::new),
        timekeeper_id: row
            .try_get::<Option<String>, _>("timekeeper_id")?
            .map(TimekeeperId::new),
        duration_hours: row.try_get("duration_hours")?,
        description: row.try_get("description")?,
        utbms_code: row
            .try_get::<Option<String>, _>("utbms_code")?
            .map(UtbmsCode::new),
    })
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn insert_entry(&self, entry: &TimeEntry) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"INSERT OR IGNORE INTO time_entries
               (id, work_date, client_id, matter_id, timekeeper_id, duration_hours, description, utbms_code)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(entry.id.as_str())
        .bind(entry.work_date)
        .bind(entry.client_id.as_ref().map(|c| c.as_str()))
        .bind(entry.matter_id.as_ref().map(|m| m.as_str()))
        .bind(entry.timekeeper_id.as_ref().map(|t| t.as_str()))
        .bind(entry.duration_hours)
        .bind(entry.description.as_str())
        .bind(entry.utbms_code.as_ref().map(|c| c.as_str()))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_entries(&self) -> anyhow::Result<Vec<TimeEntry>> {
        let rows = sqlx::query("SELECT * FROM time_entries ORDER BY work_date ASC, id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn entries_between(
        &self,
        matter_id: &MatterId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> anyhow::Result<Vec<TimeEntry>> {
        let rows = sqlx::query(
            r#"SELECT * FROM time_entries
               WHERE matter_id = ? AND work_date BETWEEN ? AND ?
               ORDER BY work_date ASC, id ASC"#,
        )
        .bind(matter_id.as_str())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(entry_from_row).collect()
    }

    async fn upsert_matter(&self, matter: &Matter) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT OR REPLACE INTO matters
               (client_matter_id, client_id, law_firm_matter_id, law_firm_id, description)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(matter.client_matter_id.as_str())
        .bind(matter.client_id.as_str())
        .bind(matter.law_firm_matter_id.as_str())
        .bind(matter.law_firm_id.as_str())
        .bind(matter.description.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_matter(&self, client_matter_id: &str) -> anyhow::Result<Option<Matter>> {
        let row = sqlx::query("SELECT * FROM matters WHERE client_matter_id = ?")
            .bind(client_matter_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(Matter {
                client_id: ClientId::new(row.try_get::<String, _>("client_id")?),
                client_matter_id: row.try_get("client_matter_id")?,
                law_firm_matter_id: row.try_get("law_firm_matter_id")?,
                law_firm_id: row.try_get("law_firm_id")?,
                description: row.try_get("description")?,
            })
        })
        .transpose()
    }

    async fn upsert_timekeeper(&self, timekeeper: &Timekeeper) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO timekeepers (id, name, classification, rate) VALUES (?, ?, ?, ?)",
        )
        .bind(timekeeper.id.as_str())
        .bind(timekeeper.name.as_str())
        .bind(timekeeper.classification.as_str())
        .bind(timekeeper.rate.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_timekeeper(&self, id: &TimekeeperId) -> anyhow::Result<Option<Timekeeper>> {
        let row = sqlx::query("SELECT * FROM timekeepers WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            let rate: String = row.try_get("rate")?;
            Ok(Timekeeper {
                id: TimekeeperId::new(row.try_get::<String, _>("id")?),
                name: row.try_get("name")?,
                classification: row.try_get("classification")?,
                rate: Decimal::from_str(&rate)
                    .with_context(|| format!("invalid stored rate {rate:?}"))?,
            })
        })
        .transpose()
    }

    async fn lookup_override(&self, phrase: &str) -> anyhow::Result<Option<UtbmsOverride>> {
        let row = sqlx::query("SELECT * FROM utbms_overrides WHERE phrase = ?")
            .bind(phrase)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok(UtbmsOverride {
                phrase: row.try_get("phrase")?,
                task_code: row.try_get("task_code")?,
                activity_code: row.try_get("activity_code")?,
            })
        })
        .transpose()
    }

    async fn upsert_override(&self, codes: &UtbmsOverride) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO utbms_overrides (phrase, task_code, activity_code) VALUES (?, ?, ?)",
        )
        .bind(codes.phrase.as_str())
        .bind(codes.task_code.as_deref())
        .bind(codes.activity_code.as_deref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_storage() -> SqliteStorage {
        let storage = SqliteStorage::in_memory().await.unwrap();
        storage.init_schema().await.unwrap();
        storage
    }

    fn entry(date: &str, desc: &str) -> TimeEntry {
        let mut e = TimeEntry::new(desc, 1.2);
        e.work_date = Some(date.parse().unwrap());
        e.matter_id = Some(MatterId::new("MATTER-A"));
        e
    }

    #[tokio::test]
    async fn test_insert_and_dedup() {
        let storage = test_storage().await;

        let first = entry("2025-08-01", "Draft motion to compel further responses");
        assert!(storage.insert_entry(&first).await.unwrap());

        // Same (date, description) with a fresh id is ignored
        let dup = entry("2025-08-01", "Draft motion to compel further responses");
        assert!(!storage.insert_entry(&dup).await.unwrap());

        assert_eq!(storage.list_entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_entries_between_filters_by_matter_and_range() {
        let storage = test_storage().await;

        storage.insert_entry(&entry("2025-08-01", "a")).await.unwrap();
        storage.insert_entry(&entry("2025-08-05", "b")).await.unwrap();
        storage.insert_entry(&entry("2025-09-01", "c")).await.unwrap();

        let mut other = entry("2025-08-02", "d");
        other.matter_id = Some(MatterId::new("MATTER-B"));
        storage.insert_entry(&other).await.unwrap();

        let found = storage
            .entries_between(
                &MatterId::new("MATTER-A"),
                "2025-08-01".parse().unwrap(),
                "2025-08-31".parse().unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].description, "a");
        assert_eq!(found[1].description, "b");
    }

    #[tokio::test]
    async fn test_matter_and_timekeeper_round_trip() {
        let storage = test_storage().await;

        let matter = Matter {
            client_id: ClientId::new("CLIENT001"),
            client_matter_id: "CM-1".to_string(),
            law_firm_matter_id: "LFM-1".to_string(),
            law_firm_id: "FIRM-1".to_string(),
            description: Some("Alvarez v. Corp".to_string()),
        };
        storage.upsert_matter(&matter).await.unwrap();

        let loaded = storage.get_matter("CM-1").await.unwrap().unwrap();
        assert_eq!(loaded.law_firm_id, "FIRM-1");
        assert!(storage.get_matter("CM-2").await.unwrap().is_none());

        let tk = Timekeeper {
            id: TimekeeperId::new("TK123"),
            name: "Alice Johnson".to_string(),
            classification: "PT".to_string(),
            rate: Decimal::new(45000, 2),
        };
        storage.upsert_timekeeper(&tk).await.unwrap();

        let loaded = storage
            .get_timekeeper(&TimekeeperId::new("TK123"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.rate, Decimal::new(45000, 2));
    }

    #[tokio::test]
    async fn test_override_round_trip() {
        let storage = test_storage().await;

        let codes = UtbmsOverride {
            phrase: "weekly team sync".to_string(),
            task_code: Some("L130".to_string()),
            activity_code: None,
        };
        storage.upsert_override(&codes).await.unwrap();

        let loaded = storage
            .lookup_override("weekly team sync")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded.task_code.as_deref(), Some("L130"));
        assert!(loaded.activity_code.is_none());

        assert!(storage.lookup_override("other").await.unwrap().is_none());
    }
}
