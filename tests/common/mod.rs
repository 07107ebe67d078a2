//! Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fake::Fake;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use titlesync::adapters::database::TitleSink;
use titlesync::domain::{Result, SinkError, TitleId, TitleRecord, TitleRecordBuilder, TitleRow};

/// Committed state of a [`MemorySink`], shared with the test
#[derive(Debug, Default)]
pub struct MemoryState {
    pub rows: BTreeMap<String, TitleRow>,
    pub begins: usize,
    pub commits: usize,
    pub rollbacks: usize,
    pub statements: Vec<String>,
    pub closed: bool,
}

/// In-memory transactional sink
///
/// Each transaction works on a copy of the committed rows; `commit` swaps it
/// in and `rollback` discards it. Inserting an existing id fails with 23505.
pub struct MemorySink {
    state: Arc<Mutex<MemoryState>>,
    staged: Option<BTreeMap<String, TitleRow>>,
    failing_ids: HashSet<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            staged: None,
            failing_ids: HashSet::new(),
        }
    }

    /// Sink whose committed state already holds `rows`
    pub fn with_rows(rows: Vec<TitleRow>) -> Self {
        let sink = Self::new();
        {
            let mut state = sink.state.lock().unwrap();
            for row in rows {
                state.rows.insert(row.id.to_string(), row);
            }
        }
        sink
    }

    /// Data statements for `id` fail with a check violation
    pub fn failing_on(mut self, id: &str) -> Self {
        self.failing_ids.insert(id.to_string());
        self
    }

    pub fn state(&self) -> Arc<Mutex<MemoryState>> {
        Arc::clone(&self.state)
    }

    pub fn row(&self, id: &str) -> Option<TitleRow> {
        self.state.lock().unwrap().rows.get(id).cloned()
    }

    pub fn row_count(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    fn open(&self) -> Result<()> {
        if self.state.lock().unwrap().closed {
            return Err(SinkError::Closed.into());
        }
        Ok(())
    }

    fn staged(&mut self, id: &str, statement: &str) -> Result<&mut BTreeMap<String, TitleRow>> {
        self.open()?;
        self.state
            .lock()
            .unwrap()
            .statements
            .push(format!("{statement} {id}"));

        if self.failing_ids.contains(id) {
            return Err(SinkError::StatementFailed {
                sqlstate: Some("23514".to_string()),
                message: format!("check constraint violated by {id}"),
            }
            .into());
        }

        self.staged.as_mut().ok_or_else(|| {
            SinkError::StatementFailed {
                sqlstate: Some("25P01".to_string()),
                message: "no transaction in progress".to_string(),
            }
            .into()
        })
    }
}

#[async_trait]
impl TitleSink for MemorySink {
    async fn begin(&mut self) -> Result<()> {
        self.open()?;
        let mut state = self.state.lock().unwrap();
        state.begins += 1;
        self.staged = Some(state.rows.clone());
        Ok(())
    }

    async fn insert(&mut self, row: &TitleRow) -> Result<()> {
        let staged = self.staged(row.id.as_str(), "INSERT")?;
        if staged.contains_key(row.id.as_str()) {
            return Err(SinkError::StatementFailed {
                sqlstate: Some("23505".to_string()),
                message: format!("duplicate key value (id)=({})", row.id),
            }
            .into());
        }
        staged.insert(row.id.to_string(), row.clone());
        Ok(())
    }

    async fn upsert(&mut self, row: &TitleRow) -> Result<()> {
        let staged = self.staged(row.id.as_str(), "UPSERT")?;
        staged.insert(row.id.to_string(), row.clone());
        Ok(())
    }

    async fn delete(&mut self, id: &TitleId) -> Result<u64> {
        let staged = self.staged(id.as_str(), "DELETE")?;
        Ok(u64::from(staged.remove(id.as_str()).is_some()))
    }

    async fn commit(&mut self) -> Result<()> {
        self.open()?;
        let staged = self.staged.take().ok_or(SinkError::TransactionFailed {
            operation: "COMMIT",
            message: "no transaction in progress".to_string(),
        })?;
        let mut state = self.state.lock().unwrap();
        state.rows = staged;
        state.commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        self.open()?;
        self.staged = None;
        self.state.lock().unwrap().rollbacks += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.staged = None;
        self.state.lock().unwrap().closed = true;
        Ok(())
    }
}

pub fn id(value: &str) -> TitleId {
    TitleId::new(value).unwrap()
}

pub const P1: &str = "((0,0),(4,0),(4,3))";
pub const C1: &str = "(2.6667,1)";
pub const P2: &str = "((10,10),(14,10),(14,13),(10,13))";
pub const C2: &str = "(12,11.5)";

/// Complete record with geometry and no timestamps
pub fn title(id_value: &str, title_number: &str, polygon: &str, centroid: &str) -> TitleRecord {
    TitleRecordBuilder::new(id(id_value))
        .title_number(title_number)
        .polygon(polygon)
        .centroid(centroid)
        .build()
}

/// Committed row equivalent of [`title`]
pub fn row(record: &TitleRecord, updated_at: DateTime<Utc>) -> TitleRow {
    TitleRow::coerce(record, updated_at).unwrap()
}

/// Random but well-formed record: a square parcel around a random centre
pub fn fake_title(id_value: usize) -> TitleRecord {
    let lng: f64 = (-2.0..1.5).fake();
    let lat: f64 = (50.5..55.0).fake();
    let half: f64 = (0.0001..0.001).fake();
    let number: u32 = (1000..999_999).fake();

    let polygon = format!(
        "(({},{}),({},{}),({},{}),({},{}))",
        lng - half,
        lat - half,
        lng + half,
        lat - half,
        lng + half,
        lat + half,
        lng - half,
        lat + half
    );

    TitleRecordBuilder::new(id(&id_value.to_string()))
        .title_number(format!("AGL{number}"))
        .polygon(polygon)
        .centroid(format!("({lng},{lat})"))
        .build()
}
