use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// 노출 등급 × 시멘트 종류 × 강도 등급 → 최소 피복(mm). `None`은 `NULL` 칸.
type Grades = BTreeMap<String, Option<u32>>;
type Cements = BTreeMap<String, Grades>;

/// 피복 조회 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverLookup {
    /// 최소 피복 (mm)
    Cover(u32),
    /// 표에 없거나 `NULL`인 조합
    NotTabulated {
        exposure: String,
        cement: String,
        grade: String,
    },
}

impl CoverLookup {
    pub fn value(&self) -> Option<u32> {
        match self {
            CoverLookup::Cover(mm) => Some(*mm),
            CoverLookup::NotTabulated { .. } => None,
        }
    }
}

impl fmt::Display for CoverLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverLookup::Cover(mm) => write!(f, "{mm} mm"),
            CoverLookup::NotTabulated {
                exposure,
                cement,
                grade,
            } => write!(f, "표에 없는 조합: {exposure} / {cement} / {grade}"),
        }
    }
}

/// 저장 순서대로 나열한 한 칸.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverEntry<'a> {
    pub exposure: &'a str,
    pub cement: &'a str,
    pub grade: &'a str,
    pub cover: Option<u32>,
}

/// 읽기 전용 최소 피복 표.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverTable {
    entries: BTreeMap<String, Cements>,
}

impl CoverTable {
    /// 정확히 일치하는 조합만 찾는다. 앞뒤 공백은 무시한다.
    pub fn lookup(&self, exposure: &str, cement: &str, grade: &str) -> CoverLookup {
        let (exposure, cement, grade) = (exposure.trim(), cement.trim(), grade.trim());
        let found = self
            .entries
            .get(exposure)
            .and_then(|c| c.get(cement))
            .and_then(|g| g.get(grade))
            .copied()
            .flatten();
        match found {
            Some(mm) => CoverLookup::Cover(mm),
            None => CoverLookup::NotTabulated {
                exposure: exposure.to_string(),
                cement: cement.to_string(),
                grade: grade.to_string(),
            },
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = CoverEntry<'_>> {
        self.entries.iter().flat_map(|(exposure, cements)| {
            cements.iter().flat_map(move |(cement, grades)| {
                grades.iter().map(move |(grade, cover)| CoverEntry {
                    exposure,
                    cement,
                    grade,
                    cover: *cover,
                })
            })
        })
    }

    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 같은 조합에 서로 다른 피복 값이 들어온 경우.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverConflict {
    pub existing: u32,
    pub incoming: u32,
}

/// 피복 표 초안. 축거리 표와 같은 충돌 규칙을 따른다.
#[derive(Debug, Clone, Default)]
pub struct CoverDraft {
    entries: BTreeMap<String, Cements>,
}

impl CoverDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 같은 값이면 그대로, `NULL`은 미입력으로 보고, 서로 다른 값은 충돌로 돌려준다.
    /// 반환값은 좌표가 새로 생겼는지 여부.
    pub fn insert(
        &mut self,
        exposure: &str,
        cement: &str,
        grade: &str,
        cover: Option<u32>,
    ) -> Result<bool, CoverConflict> {
        let slot = self
            .entries
            .entry(exposure.to_string())
            .or_default()
            .entry(cement.to_string())
            .or_default()
            .entry(grade.to_string());
        match slot {
            Entry::Vacant(v) => {
                v.insert(cover);
                Ok(true)
            }
            Entry::Occupied(mut o) => match (*o.get(), cover) {
                (Some(existing), Some(incoming)) if existing != incoming => {
                    Err(CoverConflict { existing, incoming })
                }
                (None, Some(_)) => {
                    o.insert(cover);
                    Ok(false)
                }
                _ => Ok(false),
            },
        }
    }

    pub fn finish(self) -> CoverTable {
        CoverTable {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_filled_but_values_conflict() {
        let mut draft = CoverDraft::new();
        assert_eq!(draft.insert("XC1", "CEM I", "C20/25", None), Ok(true));
        assert_eq!(draft.insert("XC1", "CEM I", "C20/25", Some(25)), Ok(false));
        assert_eq!(draft.insert("XC1", "CEM I", "C20/25", None), Ok(false));
        assert_eq!(
            draft.insert("XC1", "CEM I", "C20/25", Some(30)),
            Err(CoverConflict {
                existing: 25,
                incoming: 30
            })
        );
        let table = draft.finish();
        assert_eq!(table.lookup("XC1", "CEM I", "C20/25"), CoverLookup::Cover(25));
    }
}
