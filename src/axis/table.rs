//! 정규 조회표: 내화 등급 → 정렬된 ω 격자 → (그 ω의 정렬된 n 격자 → 구간점 목록).
//!
//! ω마다 n 격자가 다를 수 있으므로 열(column)마다 자기 n 배열을 가진다.
//! 한 번 만들어진 표는 읽기 전용이다.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::breakpoint::BreakpointList;
use super::knot::Knot;
use crate::fire_rating::FireRating;

/// 한 ω 격자점의 n 열.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadColumn {
    n_knots: Vec<Knot>,
    cells: Vec<BreakpointList>,
}

impl LoadColumn {
    pub fn n_knots(&self) -> &[Knot] {
        &self.n_knots
    }

    pub fn cell(&self, index: usize) -> Option<&BreakpointList> {
        self.cells.get(index)
    }

    pub fn get(&self, n: Knot) -> Option<&BreakpointList> {
        let i = self.n_knots.binary_search(&n).ok()?;
        self.cells.get(i)
    }
}

/// 한 내화 등급의 (ω, n) 희소 격자.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingGrid {
    omega_knots: Vec<Knot>,
    columns: Vec<LoadColumn>,
}

impl RatingGrid {
    pub fn omega_knots(&self) -> &[Knot] {
        &self.omega_knots
    }

    pub fn column(&self, index: usize) -> Option<&LoadColumn> {
        self.columns.get(index)
    }

    pub fn column_at(&self, omega: Knot) -> Option<&LoadColumn> {
        let i = self.omega_knots.binary_search(&omega).ok()?;
        self.columns.get(i)
    }
}

/// 표의 한 칸과 그 좌표.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableEntry<'a> {
    pub fire_rating: FireRating,
    pub omega: Knot,
    pub n: Knot,
    pub breakpoints: &'a BreakpointList,
}

/// 축거리 정규 조회표.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisTable {
    ratings: BTreeMap<FireRating, RatingGrid>,
}

impl AxisTable {
    pub fn fire_ratings(&self) -> impl Iterator<Item = &FireRating> {
        self.ratings.keys()
    }

    pub fn grid(&self, fire_rating: &FireRating) -> Option<&RatingGrid> {
        self.ratings.get(fire_rating)
    }

    pub fn get(&self, fire_rating: &FireRating, omega: Knot, n: Knot) -> Option<&BreakpointList> {
        self.grid(fire_rating)?.column_at(omega)?.get(n)
    }

    /// 모든 칸을 (등급, ω, n) 순으로 돈다.
    pub fn entries(&self) -> impl Iterator<Item = TableEntry<'_>> {
        self.ratings.iter().flat_map(|(rating, grid)| {
            grid.omega_knots
                .iter()
                .zip(&grid.columns)
                .flat_map(move |(omega, column)| {
                    column
                        .n_knots
                        .iter()
                        .zip(&column.cells)
                        .map(move |(n, breakpoints)| TableEntry {
                            fire_rating: *rating,
                            omega: *omega,
                            n: *n,
                            breakpoints,
                        })
                })
        })
    }

    /// 칸 수(`NULL` 포함).
    pub fn len(&self) -> usize {
        self.ratings
            .values()
            .flat_map(|g| g.columns.iter())
            .map(|c| c.cells.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}

/// 같은 좌표에 서로 다른 자료가 들어온 경우.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub existing: BreakpointList,
    pub incoming: BreakpointList,
}

/// 삽입 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// 새 좌표
    Added,
    /// 같은 자료가 이미 있음
    Identical,
    /// `NULL` 칸을 자료로 채움
    FilledNull,
    /// 자료가 있는 칸에 `NULL`이 들어와 기존 값을 유지
    KeptExisting,
}

/// 표 생성 중의 가변 초안. `finish`로 읽기 전용 표가 된다.
#[derive(Debug, Clone, Default)]
pub struct TableDraft {
    entries: BTreeMap<FireRating, BTreeMap<Knot, BTreeMap<Knot, BreakpointList>>>,
}

impl TableDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 자료가 있는 칸을 다른 자료로 덮어쓰지 않는다. 빈(`NULL`) 칸은 미입력으로 본다.
    pub fn insert(
        &mut self,
        fire_rating: FireRating,
        omega: Knot,
        n: Knot,
        breakpoints: BreakpointList,
    ) -> Result<Insertion, Conflict> {
        let slot = self
            .entries
            .entry(fire_rating)
            .or_default()
            .entry(omega)
            .or_default()
            .entry(n);
        match slot {
            Entry::Vacant(v) => {
                v.insert(breakpoints);
                Ok(Insertion::Added)
            }
            Entry::Occupied(mut o) => {
                let existing = o.get();
                if *existing == breakpoints {
                    Ok(Insertion::Identical)
                } else if breakpoints.is_empty() {
                    Ok(Insertion::KeptExisting)
                } else if existing.is_empty() {
                    o.insert(breakpoints);
                    Ok(Insertion::FilledNull)
                } else {
                    Err(Conflict {
                        existing: existing.clone(),
                        incoming: breakpoints,
                    })
                }
            }
        }
    }

    pub fn finish(self) -> AxisTable {
        let ratings = self
            .entries
            .into_iter()
            .map(|(rating, omegas)| {
                let mut omega_knots = Vec::with_capacity(omegas.len());
                let mut columns = Vec::with_capacity(omegas.len());
                for (omega, loads) in omegas {
                    let (n_knots, cells) = loads.into_iter().unzip();
                    omega_knots.push(omega);
                    columns.push(LoadColumn { n_knots, cells });
                }
                (
                    rating,
                    RatingGrid {
                        omega_knots,
                        columns,
                    },
                )
            })
            .collect();
        AxisTable { ratings }
    }
}
