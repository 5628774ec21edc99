//! 원본 행을 순서대로 읽어 정규 조회표를 만든다.
//!
//! - 내화 등급 칸이 비면 직전 등급을 이어받는다(병합 셀).
//! - ω가 없거나 숫자가 아니면 그 행만 경고 후 건너뛴다.
//! - 같은 좌표의 다른 자료는 치명적 충돌이다.

use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::cell::{parse_cell, CellError, ParseMode};
use super::knot::Knot;
use super::table::{AxisTable, Insertion, TableDraft};
use super::BreakpointList;
use crate::category::CategoryError;
use crate::config::AxisSourceConfig;
use crate::fire_rating::FireRating;
use crate::source::{SourceError, SourceTable};

/// 표 생성을 중단시키는 오류. 이 경우 표는 반환되지 않는다.
#[derive(Debug, Error)]
pub enum IngestionError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("원본에 설정된 열이 없습니다: '{header}'")]
    MissingColumn { header: String },
    #[error("n 열 설정 오류: '{header}' (n={n})")]
    InvalidLoadColumn { header: String, n: f64 },
    #[error("n 값이 겹치는 열: '{header}' (n={n})")]
    DuplicateLoadColumn { header: String, n: Knot },
    #[error("{line}행 범주 오류 ('{label}'): {source}")]
    Category {
        line: usize,
        label: String,
        #[source]
        source: CategoryError,
    },
    #[error("{line}행 셀 오류 [{fire_rating}, ω={omega}, n={n}] '{cell}': {source}")]
    Cell {
        line: usize,
        fire_rating: String,
        omega: Knot,
        n: Knot,
        cell: String,
        #[source]
        source: CellError,
    },
    #[error(
        "{line}행 자료 충돌 [{fire_rating}, ω={omega}, n={n}]: 기존 '{existing}' / 새 값 '{incoming}'"
    )]
    Conflict {
        line: usize,
        fire_rating: FireRating,
        omega: Knot,
        n: Knot,
        existing: BreakpointList,
        incoming: BreakpointList,
    },
}

/// 행을 건너뛰거나 일부만 반영한 사유.
#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    /// 앞선 행에도 내화 등급이 없음
    MissingFireRating,
    /// 라벨이 아무 등급도 가리키지 않음(`NULL`)
    EmptyExpansion { label: String },
    MissingOmega,
    InvalidOmega { raw: String },
    /// 관대 모드에서 버린 구간
    SkippedSegments {
        fire_rating: String,
        omega: Knot,
        n: Knot,
        segments: Vec<String>,
    },
}

/// 복구 가능한 경고. 표 생성은 계속된다.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionWarning {
    pub line: usize,
    pub kind: WarningKind,
}

impl fmt::Display for IngestionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::MissingFireRating => {
                write!(f, "{}행: 내화 등급이 없어 건너뜀", self.line)
            }
            WarningKind::EmptyExpansion { label } => {
                write!(f, "{}행: '{label}' 라벨에 해당하는 등급이 없어 건너뜀", self.line)
            }
            WarningKind::MissingOmega => write!(f, "{}행: ω 값이 없어 건너뜀", self.line),
            WarningKind::InvalidOmega { raw } => {
                write!(f, "{}행: ω 값 '{raw}'이(가) 숫자가 아니어서 건너뜀", self.line)
            }
            WarningKind::SkippedSegments {
                fire_rating,
                omega,
                n,
                segments,
            } => write!(
                f,
                "{}행 [{fire_rating}, ω={omega}, n={n}]: 잘못된 구간 {}개 무시 ({})",
                self.line,
                segments.len(),
                segments.join(", ")
            ),
        }
    }
}

/// 표 생성 요약.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildReport {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub cells_parsed: usize,
    pub warnings: Vec<IngestionWarning>,
}

/// 구조화된 원본 한 행. `loads`는 생성기의 n 열 순서를 따른다.
#[derive(Debug, Clone, Copy)]
pub struct AxisRow<'a> {
    pub line: usize,
    pub fire_rating: &'a str,
    pub omega: &'a str,
    pub loads: &'a [&'a str],
}

#[derive(Debug)]
struct CarriedRating {
    label: String,
    ratings: Vec<FireRating>,
}

/// 행 단위 표 생성기.
#[derive(Debug)]
pub struct AxisTableBuilder {
    load_knots: Vec<Knot>,
    mode: ParseMode,
    current: Option<CarriedRating>,
    draft: TableDraft,
    report: BuildReport,
}

impl AxisTableBuilder {
    pub fn new(load_knots: Vec<Knot>, mode: ParseMode) -> Self {
        Self {
            load_knots,
            mode,
            current: None,
            draft: TableDraft::new(),
            report: BuildReport::default(),
        }
    }

    pub fn load_knots(&self) -> &[Knot] {
        &self.load_knots
    }

    pub fn push_row(&mut self, row: AxisRow<'_>) -> Result<(), IngestionError> {
        self.report.rows_read += 1;

        let label = row.fire_rating.trim();
        if !label.is_empty() {
            let ratings =
                FireRating::expand_label(label).map_err(|source| IngestionError::Category {
                    line: row.line,
                    label: label.to_string(),
                    source,
                })?;
            self.current = Some(CarriedRating {
                label: label.to_string(),
                ratings,
            });
        }
        let (label, ratings) = match self.current.as_ref() {
            Some(c) => (c.label.clone(), c.ratings.clone()),
            None => {
                self.skip(row.line, WarningKind::MissingFireRating);
                return Ok(());
            }
        };
        if ratings.is_empty() {
            self.skip(row.line, WarningKind::EmptyExpansion { label });
            return Ok(());
        }

        let omega_raw = row.omega.trim();
        if omega_raw.is_empty() {
            self.skip(row.line, WarningKind::MissingOmega);
            return Ok(());
        }
        let Some(omega) = Knot::parse(omega_raw) else {
            let raw = omega_raw.to_string();
            self.skip(row.line, WarningKind::InvalidOmega { raw });
            return Ok(());
        };

        for i in 0..self.load_knots.len() {
            let n = self.load_knots[i];
            let raw = row.loads.get(i).copied().unwrap_or("");
            let parsed = parse_cell(raw, self.mode).map_err(|source| IngestionError::Cell {
                line: row.line,
                fire_rating: label.clone(),
                omega,
                n,
                cell: raw.to_string(),
                source,
            })?;
            self.report.cells_parsed += 1;
            if !parsed.skipped.is_empty() {
                self.warn(
                    row.line,
                    WarningKind::SkippedSegments {
                        fire_rating: label.clone(),
                        omega,
                        n,
                        segments: parsed.skipped,
                    },
                );
            }
            for rating in &ratings {
                let outcome = self
                    .draft
                    .insert(*rating, omega, n, parsed.breakpoints.clone())
                    .map_err(|c| IngestionError::Conflict {
                        line: row.line,
                        fire_rating: *rating,
                        omega,
                        n,
                        existing: c.existing,
                        incoming: c.incoming,
                    })?;
                if outcome != Insertion::Added {
                    debug!(
                        line = row.line,
                        fire_rating = %rating,
                        omega = %omega,
                        n = %n,
                        ?outcome,
                        "중복 좌표 처리"
                    );
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> (AxisTable, BuildReport) {
        let table = self.draft.finish();
        info!(
            ratings = table.fire_ratings().count(),
            cells = table.len(),
            rows_read = self.report.rows_read,
            rows_skipped = self.report.rows_skipped,
            warnings = self.report.warnings.len(),
            "축거리 표 생성 완료"
        );
        (table, self.report)
    }

    fn skip(&mut self, line: usize, kind: WarningKind) {
        self.report.rows_skipped += 1;
        self.warn(line, kind);
    }

    fn warn(&mut self, line: usize, kind: WarningKind) {
        let warning = IngestionWarning { line, kind };
        warn!(line = warning.line, kind = ?warning.kind, "{warning}");
        self.report.warnings.push(warning);
    }
}

/// 설정된 머리글로 원본 표 전체를 읽어 조회표를 만든다.
pub fn build_axis_table(
    source: &SourceTable,
    cfg: &AxisSourceConfig,
) -> Result<(AxisTable, BuildReport), IngestionError> {
    let rating_col = require_column(source, &cfg.fire_rating_column)?;
    let omega_col = require_column(source, &cfg.omega_column)?;
    let mut load_cols = Vec::with_capacity(cfg.load_columns.len());
    let mut load_knots: Vec<Knot> = Vec::with_capacity(cfg.load_columns.len());
    for col in &cfg.load_columns {
        let knot = Knot::from_f64(col.n).ok_or_else(|| IngestionError::InvalidLoadColumn {
            header: col.header.clone(),
            n: col.n,
        })?;
        if load_knots.contains(&knot) {
            return Err(IngestionError::DuplicateLoadColumn {
                header: col.header.clone(),
                n: knot,
            });
        }
        load_cols.push(require_column(source, &col.header)?);
        load_knots.push(knot);
    }

    let mut builder = AxisTableBuilder::new(load_knots, cfg.parse_mode);
    for row in source.rows() {
        let loads: Vec<&str> = load_cols.iter().map(|&c| row.get(c)).collect();
        builder.push_row(AxisRow {
            line: row.line,
            fire_rating: row.get(rating_col),
            omega: row.get(omega_col),
            loads: &loads,
        })?;
    }
    Ok(builder.finish())
}

/// 파일을 열어 조회표를 만든다. 파일은 읽기 직후 닫힌다.
pub fn build_axis_table_from_path(
    path: &Path,
    cfg: &AxisSourceConfig,
) -> Result<(AxisTable, BuildReport), IngestionError> {
    let source = SourceTable::open(path, cfg.sheet.as_deref())?;
    build_axis_table(&source, cfg)
}

fn require_column(source: &SourceTable, header: &str) -> Result<usize, IngestionError> {
    source
        .column_index(header)
        .ok_or_else(|| IngestionError::MissingColumn {
            header: header.to_string(),
        })
}
