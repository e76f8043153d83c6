use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::domain::{ClientId, EntryId, MatterId, TimeEntry, TimekeeperId};
use crate::mapper::map_utbms;
use crate::storage::Storage;

use super::activitywatch::AwClient;

fn default_min_seconds() -> f64 {
    120.0
}

fn default_gap_merge_seconds() -> i64 {
    300
}

/// Filters applied to raw activity before it becomes billable time.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestFilters {
    #[serde(default)]
    pub nonbillable_apps: Vec<String>,

    #[serde(default)]
    pub nonbillable_hosts: Vec<String>,

    #[serde(default)]
    pub nonbillable_title_keywords: Vec<String>,

    /// Events shorter than this are noise
    #[serde(default = "default_min_seconds")]
    pub min_seconds: f64,

    /// Same-activity events this close together merge into one block
    #[serde(default = "default_gap_merge_seconds")]
    pub gap_merge_seconds: i64,
}

impl Default for IngestFilters {
    fn default() -> Self {
        IngestFilters {
            nonbillable_apps: Vec::new(),
            nonbillable_hosts: Vec::new(),
            nonbillable_title_keywords: Vec::new(),
            min_seconds: default_min_seconds(),
            gap_merge_seconds: default_gap_merge_seconds(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FiltersFile {
    #[serde(default)]
    filters: Option<IngestFilters>,
}

impl IngestFilters {
    /// Load from a YAML file of the shape `filters: {...}`, degrading
    /// to the defaults when the file is missing or malformed.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let Ok(content) = fs::read_to_string(path) else {
            return IngestFilters::default();
        };
        match serde_yaml::from_str::<FiltersFile>(&content) {
            Ok(file) => file.filters.unwrap_or_default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Filter config unparseable, using defaults");
                IngestFilters::default()
            }
        }
    }

    fn is_nonbillable(&self, app: &str, host: &str, title: &str) -> bool {
        let app = app.to_lowercase();
        let host = host.to_lowercase();
        let title = title.to_lowercase();

        self.nonbillable_apps.iter().any(|a| a.to_lowercase() == app)
            || self.nonbillable_hosts.iter().any(|h| h.to_lowercase() == host)
            || self
                .nonbillable_title_keywords
                .iter()
                .any(|k| title.contains(&k.to_lowercase()))
    }
}

/// One normalized activity interval, before filtering and merging.
#[derive(Debug, Clone)]
pub struct RawActivity {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub dur_seconds: f64,
    pub title: String,
    pub app: String,
    pub host: String,
}

/// One merged, billable block of activity.
#[derive(Debug, Clone)]
pub struct ActivitySummary {
    pub date: NaiveDate,
    pub description: String,
    pub duration_hours: f64,
    pub app: String,
    pub host: String,
}

/// Split a URL-shaped title into (host, display title).
fn split_url(url: &str) -> (String, String) {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    let (netloc, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    let host = if netloc.is_empty() {
        "web".to_string()
    } else {
        netloc.to_lowercase()
    };
    let title = format!("{host}{path}");
    (host, title)
}

/// Grouping key for merging adjacent events of the same activity.
fn activity_key(row: &RawActivity) -> String {
    let title = row.title.to_lowercase();
    let app = row.app.to_lowercase();
    let host = row.host.to_lowercase();

    if !host.is_empty() {
        return format!("web:{host}");
    }
    if app.contains("word") {
        return format!("word:{title}");
    }
    if app.contains("preview") || title.ends_with(".pdf") {
        return format!("pdf:{title}");
    }
    if app.is_empty() {
        title
    } else {
        format!("{app}:{title}")
    }
}

/// Filter noise and merge adjacent same-activity intervals into
/// billable blocks. Input must be sorted by start time.
pub fn aggregate(rows: Vec<RawActivity>, filters: &IngestFilters) -> Vec<ActivitySummary> {
    let mut merged: Vec<(String, RawActivity)> = Vec::new();

    for row in rows {
        if filters.is_nonbillable(&row.app, &row.host, &row.title) {
            continue;
        }
        if row.dur_seconds < filters.min_seconds {
            continue;
        }

        let key = activity_key(&row);
        if let Some((last_key, last)) = merged.last_mut() {
            if *last_key == key {
                let gap = (row.start - last.end).num_seconds();
                if gap <= filters.gap_merge_seconds {
                    last.end = row.end;
                    last.dur_seconds += row.dur_seconds;
                    continue;
                }
            }
        }
        merged.push((key, row));
    }

    merged
        .into_iter()
        .map(|(_, row)| ActivitySummary {
            date: row.start.date_naive(),
            description: row.title,
            duration_hours: (row.dur_seconds / 3600.0 * 10_000.0).round() / 10_000.0,
            app: row.app,
            host: row.host,
        })
        .collect()
}

/// Pull window-watcher events for a time range and reduce them to
/// billable activity blocks.
pub async fn summarize_window_activity(
    client: &AwClient,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    filters: &IngestFilters,
) -> Vec<ActivitySummary> {
    let start_iso = start.to_rfc3339_opts(SecondsFormat::Secs, true);
    let end_iso = end.to_rfc3339_opts(SecondsFormat::Secs, true);

    let buckets: Vec<String> = client
        .list_bucket_ids()
        .await
        .into_iter()
        .filter(|id| id.starts_with("aw-watcher-window_"))
        .collect();

    let mut rows = Vec::new();
    for bucket in &buckets {
        for event in client.fetch_events(bucket, &start_iso, &end_iso).await {
            let dur = event.duration.unwrap_or(0.0);
            if dur <= 0.0 {
                continue;
            }
            let Some(ts) = event
                .timestamp
                .as_deref()
                .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
                .map(|t| t.with_timezone(&Utc))
            else {
                continue;
            };

            let data = event.data;
            let app = data.app.clone().unwrap_or_default().trim().to_string();
            let mut title = data
                .title
                .or(data.app)
                .or(data.url)
                .unwrap_or_else(|| "activity".to_string());
            let mut host = String::new();
            if title.starts_with("http") {
                (host, title) = split_url(&title);
            }
            title.truncate(title.chars().take(255).map(char::len_utf8).sum());

            rows.push(RawActivity {
                start: ts,
                end: ts + Duration::milliseconds((dur * 1000.0) as i64),
                dur_seconds: dur,
                title,
                app,
                host,
            });
        }
    }

    rows.sort_by_key(|r| r.start);
    aggregate(rows, filters)
}

/// Matter context applied to every ingested entry.
#[derive(Debug, Clone)]
pub struct IngestContext {
    pub client_id: ClientId,
    pub matter_id: MatterId,
    pub timekeeper_id: Option<TimekeeperId>,
}

/// Persist activity blocks as time entries, classifying each with
/// the UTBMS keyword mapper. Re-running over the same window is
/// idempotent: storage dedups on (work_date, description).
pub async fn ingest_activities(
    storage: &dyn Storage,
    summaries: &[ActivitySummary],
    context: &IngestContext,
) -> anyhow::Result<u64> {
    let mut inserted = 0u64;

    for summary in summaries {
        let entry = TimeEntry {
            id: EntryId::new(),
            work_date: Some(summary.date),
            client_id: Some(context.client_id.clone()),
            matter_id: Some(context.matter_id.clone()),
            timekeeper_id: context.timekeeper_id.clone(),
            duration_hours: summary.duration_hours,
            description: summary.description.clone(),
            utbms_code: Some(map_utbms(
                &summary.description,
                Some(&summary.app),
                Some(&summary.host),
            )),
        };

        if storage.insert_entry(&entry).await? {
            inserted += 1;
        }
    }

    Ok(inserted)
}
