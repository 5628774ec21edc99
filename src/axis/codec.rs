//! 축거리 표 JSON 저장 형식.
//!
//! ```json
//! { "REI 90": { "omega": { "0.1000": { "n": { "0.1500": [{"b": 150.0, "a": 30.0}], "0.3000": "NULL" } } } } }
//! ```
//!
//! ω, n 키는 소수 넷째 자리 고정소수점 문자열이다. 읽을 때는 다른 표기도 받지만
//! 같은 값을 가리키는 키가 둘이면 오류로 본다.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::breakpoint::{Breakpoint, BreakpointList};
use super::cell::NULL_MARKER;
use super::knot::Knot;
use super::table::{AxisTable, TableDraft};
use crate::fire_rating::FireRating;
use crate::persistence::{read_to_string, write_atomic, KeyedEntries, PersistenceError};

#[derive(Debug, Default, Serialize)]
struct RatingDoc {
    omega: BTreeMap<String, OmegaDoc>,
}

#[derive(Debug, Default, Serialize)]
struct OmegaDoc {
    n: BTreeMap<String, CellDoc>,
}

// 읽기용. 글자 그대로 같은 키도 남겨 두어 `unique`가 잡게 한다.
#[derive(Debug, Deserialize)]
struct RatingInput {
    omega: KeyedEntries<OmegaInput>,
}

#[derive(Debug, Deserialize)]
struct OmegaInput {
    n: KeyedEntries<CellDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum CellDoc {
    Points(Vec<Breakpoint>),
    Marker(String),
}

pub fn to_json(table: &AxisTable) -> Result<String, PersistenceError> {
    let mut doc: BTreeMap<String, RatingDoc> = BTreeMap::new();
    for entry in table.entries() {
        let cell = if entry.breakpoints.is_empty() {
            CellDoc::Marker(NULL_MARKER.to_string())
        } else {
            CellDoc::Points(entry.breakpoints.points().to_vec())
        };
        doc.entry(entry.fire_rating.to_string())
            .or_default()
            .omega
            .entry(entry.omega.key())
            .or_default()
            .n
            .insert(entry.n.key(), cell);
    }
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn from_json(text: &str) -> Result<AxisTable, PersistenceError> {
    let doc: KeyedEntries<RatingInput> = serde_json::from_str(text)?;
    let mut draft = TableDraft::new();
    let mut ratings: BTreeMap<FireRating, String> = BTreeMap::new();
    for (rating_key, rating_input) in doc {
        let rating = rating_key
            .parse::<FireRating>()
            .map_err(|e| PersistenceError::InvalidKey {
                key: rating_key.clone(),
                reason: e.to_string(),
            })?;
        unique(&mut ratings, rating, &rating_key)?;

        let mut omegas: BTreeMap<Knot, String> = BTreeMap::new();
        for (omega_key, omega_input) in rating_input.omega {
            let omega = parse_knot(&omega_key)?;
            unique(&mut omegas, omega, &omega_key)?;

            let mut loads: BTreeMap<Knot, String> = BTreeMap::new();
            for (n_key, cell) in omega_input.n {
                let n = parse_knot(&n_key)?;
                unique(&mut loads, n, &n_key)?;
                let location = format!("{rating}, ω={omega_key}, n={n_key}");
                let breakpoints = decode_cell(cell, &location)?;
                draft
                    .insert(rating, omega, n, breakpoints)
                    .map_err(|c| PersistenceError::DuplicateKey {
                        first: c.existing.to_string(),
                        second: c.incoming.to_string(),
                    })?;
            }
        }
    }
    Ok(draft.finish())
}

pub fn save(path: &Path, table: &AxisTable) -> Result<(), PersistenceError> {
    let json = to_json(table)?;
    write_atomic(path, json.as_bytes())?;
    info!(path = %path.display(), cells = table.len(), "축거리 표 저장");
    Ok(())
}

pub fn load(path: &Path) -> Result<AxisTable, PersistenceError> {
    let table = from_json(&read_to_string(path)?)?;
    info!(path = %path.display(), cells = table.len(), "축거리 표 로드");
    Ok(table)
}

fn decode_cell(cell: CellDoc, location: &str) -> Result<BreakpointList, PersistenceError> {
    match cell {
        CellDoc::Points(points) => {
            BreakpointList::from_sorted(points).map_err(|source| PersistenceError::Breakpoint {
                location: location.to_string(),
                source,
            })
        }
        CellDoc::Marker(m) if m.trim().eq_ignore_ascii_case(NULL_MARKER) => {
            Ok(BreakpointList::empty())
        }
        CellDoc::Marker(m) => Err(PersistenceError::InvalidMarker {
            marker: m,
            location: location.to_string(),
        }),
    }
}

fn parse_knot(key: &str) -> Result<Knot, PersistenceError> {
    Knot::parse(key).ok_or_else(|| PersistenceError::InvalidKey {
        key: key.to_string(),
        reason: "소수 넷째 자리까지의 0 이상 숫자가 아닙니다".to_string(),
    })
}

fn unique<K: Ord>(
    seen: &mut BTreeMap<K, String>,
    key: K,
    raw: &str,
) -> Result<(), PersistenceError> {
    if let Some(first) = seen.get(&key) {
        return Err(PersistenceError::DuplicateKey {
            first: first.clone(),
            second: raw.to_string(),
        });
    }
    seen.insert(key, raw.to_string());
    Ok(())
}
