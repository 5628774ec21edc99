//! 피복 표 JSON 형식: `{ 노출: { 시멘트: { 강도: { "cover": 정수 | null } } } }`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::table::{CoverDraft, CoverTable};
use crate::persistence::{read_to_string, write_atomic, KeyedEntries, PersistenceError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct CoverDoc {
    cover: Option<u32>,
}

type Doc = BTreeMap<String, BTreeMap<String, BTreeMap<String, CoverDoc>>>;
type InputDoc = KeyedEntries<KeyedEntries<KeyedEntries<CoverDoc>>>;

pub fn to_json(table: &CoverTable) -> Result<String, PersistenceError> {
    let mut doc = Doc::new();
    for entry in table.entries() {
        doc.entry(entry.exposure.to_string())
            .or_default()
            .entry(entry.cement.to_string())
            .or_default()
            .insert(entry.grade.to_string(), CoverDoc { cover: entry.cover });
    }
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn from_json(text: &str) -> Result<CoverTable, PersistenceError> {
    let doc: InputDoc = serde_json::from_str(text)?;
    let mut draft = CoverDraft::new();
    for (exposure, cements) in doc {
        let exposure = label(&exposure)?;
        for (cement, grades) in cements {
            let cement = label(&cement)?;
            for (grade, cell) in grades {
                let grade = label(&grade)?;
                let added = draft.insert(exposure, cement, grade, cell.cover).map_err(|c| {
                    PersistenceError::DuplicateKey {
                        first: format!("{exposure} / {cement} / {grade} = {}", c.existing),
                        second: format!("{exposure} / {cement} / {grade} = {}", c.incoming),
                    }
                })?;
                if !added {
                    return Err(PersistenceError::DuplicateKey {
                        first: format!("{exposure} / {cement} / {grade}"),
                        second: format!("{exposure} / {cement} / {grade}"),
                    });
                }
            }
        }
    }
    Ok(draft.finish())
}

pub fn save(path: &Path, table: &CoverTable) -> Result<(), PersistenceError> {
    let json = to_json(table)?;
    write_atomic(path, json.as_bytes())?;
    info!(path = %path.display(), combinations = table.len(), "피복 표 저장");
    Ok(())
}

pub fn load(path: &Path) -> Result<CoverTable, PersistenceError> {
    let table = from_json(&read_to_string(path)?)?;
    info!(path = %path.display(), combinations = table.len(), "피복 표 로드");
    Ok(table)
}

/// 앞뒤 공백을 정리한 라벨. 정리 후 같아지는 두 키는 `insert`에서 중복으로 걸린다.
fn label(key: &str) -> Result<&str, PersistenceError> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(PersistenceError::InvalidKey {
            key: key.to_string(),
            reason: "빈 라벨".to_string(),
        });
    }
    Ok(trimmed)
}
