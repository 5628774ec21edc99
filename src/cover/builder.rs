//! 최소 피복 원본 행을 조합별 표로 펼친다.
//!
//! 노출 등급과 시멘트 종류 칸이 비면 직전 값을 이어받고, 강도 등급은 이어받지
//! 않는다. 세 라벨을 각각 전개한 데카르트 곱 모든 조합에 같은 피복 값을 넣는다.

use std::fmt;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::table::{CoverDraft, CoverTable};
use crate::category::{CategoryAxis, CategoryError};
use crate::config::CoverSourceConfig;
use crate::source::{SourceError, SourceTable};

#[derive(Debug, Error)]
pub enum CoverIngestionError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("원본에 설정된 열이 없습니다: '{header}'")]
    MissingColumn { header: String },
    #[error("{line}행 범주 오류 ('{label}'): {source}")]
    Category {
        line: usize,
        label: String,
        #[source]
        source: CategoryError,
    },
    #[error("{line}행 피복 값 '{raw}'이(가) 0 이상의 정수 또는 NULL이 아닙니다")]
    InvalidCover { line: usize, raw: String },
    #[error("{line}행 자료 충돌 [{exposure} / {cement} / {grade}]: 기존 {existing} mm / 새 값 {incoming} mm")]
    Conflict {
        line: usize,
        exposure: String,
        cement: String,
        grade: String,
        existing: u32,
        incoming: u32,
    },
}

/// 행을 건너뛴 사유.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverWarningKind {
    MissingExposure,
    MissingCement,
    /// 해당 열 라벨이 아무 값도 가리키지 않음
    EmptyExpansion { column: &'static str, label: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverWarning {
    pub line: usize,
    pub kind: CoverWarningKind,
}

impl fmt::Display for CoverWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            CoverWarningKind::MissingExposure => {
                write!(f, "{}행: 노출 등급이 없어 건너뜀", self.line)
            }
            CoverWarningKind::MissingCement => {
                write!(f, "{}행: 시멘트 종류가 없어 건너뜀", self.line)
            }
            CoverWarningKind::EmptyExpansion { column, label } => write!(
                f,
                "{}행: {column} 라벨 '{label}'에 해당하는 값이 없어 건너뜀",
                self.line
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoverBuildReport {
    pub rows_read: usize,
    pub rows_skipped: usize,
    /// 전개 후 기록한 조합 수(중복 포함)
    pub combinations: usize,
    pub warnings: Vec<CoverWarning>,
}

/// 구조화된 원본 한 행.
#[derive(Debug, Clone, Copy)]
pub struct CoverRow<'a> {
    pub line: usize,
    pub exposure: &'a str,
    pub cement: &'a str,
    pub grade: &'a str,
    pub cover: &'a str,
}

/// 세 범주 축.
#[derive(Debug, Clone)]
pub struct CoverAxes {
    pub exposure: CategoryAxis,
    pub cement: CategoryAxis,
    pub grade: CategoryAxis,
}

impl CoverAxes {
    pub fn from_config(cfg: &CoverSourceConfig) -> Self {
        Self {
            exposure: CategoryAxis::new("노출 등급", cfg.exposure_classes.iter().cloned()),
            cement: CategoryAxis::new("시멘트 종류", cfg.cement_types.iter().cloned()),
            grade: CategoryAxis::new("강도 등급", cfg.concrete_grades.iter().cloned()),
        }
    }
}

#[derive(Debug)]
pub struct CoverTableBuilder {
    axes: CoverAxes,
    last_exposure: Option<String>,
    last_cement: Option<String>,
    draft: CoverDraft,
    report: CoverBuildReport,
}

impl CoverTableBuilder {
    pub fn new(axes: CoverAxes) -> Self {
        Self {
            axes,
            last_exposure: None,
            last_cement: None,
            draft: CoverDraft::new(),
            report: CoverBuildReport::default(),
        }
    }

    pub fn push_row(&mut self, row: CoverRow<'_>) -> Result<(), CoverIngestionError> {
        self.report.rows_read += 1;

        let exposure = carry(&mut self.last_exposure, row.exposure);
        let cement = carry(&mut self.last_cement, row.cement);
        let Some(exposure) = exposure else {
            self.skip(row.line, CoverWarningKind::MissingExposure);
            return Ok(());
        };
        let Some(cement) = cement else {
            self.skip(row.line, CoverWarningKind::MissingCement);
            return Ok(());
        };
        let grade = row.grade.trim();

        let exposures = expand(&self.axes.exposure, &exposure, row.line)?;
        let cements = expand(&self.axes.cement, &cement, row.line)?;
        let grades = expand(&self.axes.grade, grade, row.line)?;

        for (column, label, values) in [
            ("노출 등급", exposure.as_str(), &exposures),
            ("시멘트 종류", cement.as_str(), &cements),
            ("강도 등급", grade, &grades),
        ] {
            if values.is_empty() {
                let label = label.to_string();
                self.skip(row.line, CoverWarningKind::EmptyExpansion { column, label });
                return Ok(());
            }
        }
        let cover = parse_cover(row.cover, row.line)?;

        for e in &exposures {
            for c in &cements {
                for g in &grades {
                    let added = self.draft.insert(e, c, g, cover).map_err(|conflict| {
                        CoverIngestionError::Conflict {
                            line: row.line,
                            exposure: e.clone(),
                            cement: c.clone(),
                            grade: g.clone(),
                            existing: conflict.existing,
                            incoming: conflict.incoming,
                        }
                    })?;
                    if !added {
                        debug!(line = row.line, exposure = %e, cement = %c, grade = %g, "중복 조합 처리");
                    }
                    self.report.combinations += 1;
                }
            }
        }
        Ok(())
    }

    pub fn finish(self) -> (CoverTable, CoverBuildReport) {
        let table = self.draft.finish();
        info!(
            combinations = table.len(),
            rows_read = self.report.rows_read,
            rows_skipped = self.report.rows_skipped,
            warnings = self.report.warnings.len(),
            "피복 표 생성 완료"
        );
        (table, self.report)
    }

    fn skip(&mut self, line: usize, kind: CoverWarningKind) {
        let warning = CoverWarning { line, kind };
        warn!(line = warning.line, kind = ?warning.kind, "{warning}");
        self.report.rows_skipped += 1;
        self.report.warnings.push(warning);
    }
}

/// 비어 있으면 직전 값을, 아니면 새 값을 기억하고 돌려준다.
fn carry(last: &mut Option<String>, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if !raw.is_empty() {
        *last = Some(raw.to_string());
    }
    last.clone()
}

fn expand(
    axis: &CategoryAxis,
    label: &str,
    line: usize,
) -> Result<Vec<String>, CoverIngestionError> {
    axis.expand(label)
        .map_err(|source| CoverIngestionError::Category {
            line,
            label: label.to_string(),
            source,
        })
}

fn parse_cover(raw: &str, line: usize) -> Result<Option<u32>, CoverIngestionError> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("NULL") {
        return Ok(None);
    }
    raw.parse::<u32>()
        .map(Some)
        .map_err(|_| CoverIngestionError::InvalidCover {
            line,
            raw: raw.to_string(),
        })
}

pub fn build_cover_table(
    source: &SourceTable,
    cfg: &CoverSourceConfig,
) -> Result<(CoverTable, CoverBuildReport), CoverIngestionError> {
    let column = |header: &str| {
        source
            .column_index(header)
            .ok_or_else(|| CoverIngestionError::MissingColumn {
                header: header.to_string(),
            })
    };
    let exposure_col = column(&cfg.exposure_column)?;
    let cement_col = column(&cfg.cement_column)?;
    let grade_col = column(&cfg.grade_column)?;
    let cover_col = column(&cfg.cover_column)?;

    let mut builder = CoverTableBuilder::new(CoverAxes::from_config(cfg));
    for row in source.rows() {
        builder.push_row(CoverRow {
            line: row.line,
            exposure: row.get(exposure_col),
            cement: row.get(cement_col),
            grade: row.get(grade_col),
            cover: row.get(cover_col),
        })?;
    }
    Ok(builder.finish())
}

pub fn build_cover_table_from_path(
    path: &Path,
    cfg: &CoverSourceConfig,
) -> Result<(CoverTable, CoverBuildReport), CoverIngestionError> {
    let source = SourceTable::open(path, cfg.sheet.as_deref())?;
    build_cover_table(&source, cfg)
}
