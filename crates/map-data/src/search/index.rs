//! Embedded full-text index over the search seed.
//!
//! Backed by an in-memory SQLite database with one FTS5 table per record
//! kind. Population replaces both tables in a single transaction while holding
//! the connection lock, so a query never observes a half-filled index.

use std::sync::{Mutex, MutexGuard};

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};

use crate::error::Result;
use crate::identifiers::LineId;
use crate::models::metadata::LineType;
use crate::search::{BoundsRecord, SearchSeed, StationRecord};

const SCHEMA: &str = "
    CREATE VIRTUAL TABLE stations USING fts5(
        name, description UNINDEXED, lines UNINDEXED, lng UNINDEXED, lat UNINDEXED, parent UNINDEXED
    );
    CREATE VIRTUAL TABLE bounds USING fts5(
        name, description UNINDEXED, terms, id UNINDEXED, line_type UNINDEXED, extent UNINDEXED
    );
";

#[derive(Clone, Debug, PartialEq)]
pub enum SearchResult {
    Station { record: StationRecord, rank: f64 },
    Bounds { record: BoundsRecord, rank: f64 },
}

impl SearchResult {
    /// FTS5 rank; lower is a better match.
    pub fn rank(&self) -> f64 {
        match self {
            Self::Station { rank, .. } | Self::Bounds { rank, .. } => *rank,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Station { record, .. } => &record.name,
            Self::Bounds { record, .. } => &record.name,
        }
    }
}

pub struct SearchIndex {
    conn: Mutex<Connection>,
}

impl SearchIndex {
    /// An empty index.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// An index populated with `seed`.
    pub fn from_seed(seed: &SearchSeed) -> Result<Self> {
        let index = Self::open_in_memory()?;
        index.populate(seed)?;
        Ok(index)
    }

    /// Replace the index contents with `seed`, atomically.
    pub fn populate(&self, seed: &SearchSeed) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM stations", [])?;
        tx.execute("DELETE FROM bounds", [])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO stations (name, description, lines, lng, lat, parent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for station in &seed.stations {
                insert.execute(params![
                    station.name,
                    station.description,
                    station.lines.join(","),
                    station.lng,
                    station.lat,
                    station.parent.as_str(),
                ])?;
            }

            let mut insert = tx.prepare(
                "INSERT INTO bounds (name, description, terms, id, line_type, extent)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for bounds in &seed.bounds {
                insert.execute(params![
                    bounds.name,
                    bounds.description,
                    bounds.terms,
                    bounds.id.as_str(),
                    bounds.line_type.as_str(),
                    bounds.bounds,
                ])?;
            }
        }
        tx.commit()?;

        log::debug!(
            "Indexed {} stations and {} bounds",
            seed.stations.len(),
            seed.bounds.len()
        );
        Ok(())
    }

    /// Prefix search over stations and lines, best match first.
    ///
    /// Never fails: an empty query or an engine error yields no results.
    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        let Some(expression) = match_expression(query) else {
            return Vec::new();
        };

        match self.run(&expression) {
            Ok(results) => results,
            Err(e) => {
                log::warn!("Search for {:?} failed: {}", query, e);
                Vec::new()
            }
        }
    }

    fn run(&self, expression: &str) -> Result<Vec<SearchResult>> {
        let conn = self.lock();

        let mut stmt = conn.prepare(
            "SELECT name, description, lines, lng, lat, parent, rank
             FROM stations WHERE stations MATCH ?1 ORDER BY rank",
        )?;
        let mut results = stmt
            .query_map([expression], station_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
            "SELECT name, description, terms, id, line_type, extent, rank
             FROM bounds WHERE bounds MATCH ?1 ORDER BY rank",
        )?;
        results.extend(
            stmt.query_map([expression], bounds_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        );

        results.sort_by(|a, b| a.rank().total_cmp(&b.rank()));
        Ok(results)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // The connection holds no invariants a panicking query could break.
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Quote a raw query as a single FTS5 string, doubling embedded quotes.
pub fn escape_query(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

/// The prefix MATCH expression for `query`, or `None` when there is nothing to search.
fn match_expression(query: &str) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    Some(format!("{}*", escape_query(query)))
}

fn station_row(row: &Row<'_>) -> rusqlite::Result<SearchResult> {
    let lines: String = row.get(2)?;
    Ok(SearchResult::Station {
        record: StationRecord {
            name: row.get(0)?,
            description: row.get(1)?,
            lines: lines.split(',').filter(|l| !l.is_empty()).map(String::from).collect(),
            lng: row.get(3)?,
            lat: row.get(4)?,
            parent: LineId::new(row.get::<_, String>(5)?),
        },
        rank: row.get(6)?,
    })
}

fn bounds_row(row: &Row<'_>) -> rusqlite::Result<SearchResult> {
    let line_type: LineType = row
        .get::<_, String>(4)?
        .parse()
        .map_err(|e: String| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into()))?;
    Ok(SearchResult::Bounds {
        record: BoundsRecord {
            name: row.get(0)?,
            description: row.get(1)?,
            terms: row.get(2)?,
            id: LineId::new(row.get::<_, String>(3)?),
            line_type,
            bounds: row.get(5)?,
        },
        rank: row.get(6)?,
    })
}
