use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::axis::{
    self, build_axis_table_from_path, AxisLookup, BuildReport, IngestionError, ParseMode,
    TableSlot,
};
use crate::config::{Config, ConfigError};
use crate::cover::{
    self, build_cover_table_from_path, CoverBuildReport, CoverIngestionError, CoverLookup,
};
use crate::persistence::PersistenceError;
use crate::ui_cli;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 축거리 표 생성 오류
    #[error("축거리 표 생성 오류: {0}")]
    Ingestion(#[from] IngestionError),
    /// 피복 표 생성 오류
    #[error("피복 표 생성 오류: {0}")]
    CoverIngestion(#[from] CoverIngestionError),
    /// 저장 파일 오류
    #[error("조회표 파일 오류: {0}")]
    Persistence(#[from] PersistenceError),
}

/// 원본에서 축거리 표를 만들어 저장한다. `permissive`면 설정과 관계없이 관대 모드로 읽는다.
pub fn build_axis(
    cfg: &Config,
    source: &Path,
    output: &Path,
    permissive: bool,
) -> Result<BuildReport, AppError> {
    let mut source_cfg = cfg.axis_source.clone();
    if permissive {
        source_cfg.parse_mode = ParseMode::Permissive;
    }
    let (table, report) = build_axis_table_from_path(source, &source_cfg)?;
    axis::codec::save(output, &table)?;
    Ok(report)
}

pub fn query_axis(
    cfg: &Config,
    table_path: &Path,
    fire_rating: &str,
    omega: f64,
    n: f64,
    b: f64,
) -> Result<AxisLookup, AppError> {
    let slot = TableSlot::new(axis::codec::load(table_path)?);
    let engine = slot.engine(cfg.query.width_policy);
    Ok(engine.query(fire_rating, omega, n, b))
}

pub fn build_cover(
    cfg: &Config,
    source: &Path,
    output: &Path,
) -> Result<CoverBuildReport, AppError> {
    let (table, report) = build_cover_table_from_path(source, &cfg.cover_source)?;
    cover::codec::save(output, &table)?;
    Ok(report)
}

pub fn query_cover(
    table_path: &Path,
    exposure: &str,
    cement: &str,
    grade: &str,
) -> Result<CoverLookup, AppError> {
    let table = cover::codec::load(table_path)?;
    Ok(table.lookup(exposure, cement, grade))
}

/// 대화형 조회를 실행한다. 메뉴에서 표를 다시 읽으면 새 표로 교체된다.
pub fn interactive(cfg: &Config, table_path: &Path) -> Result<(), AppError> {
    let slot = TableSlot::new(axis::codec::load(table_path)?);
    ui_cli::run_axis_queries(cfg, &slot, table_path)?;
    info!("대화형 조회 종료");
    Ok(())
}

pub fn print_axis_report(report: &BuildReport) {
    println!(
        "읽은 행: {}, 건너뛴 행: {}, 해석한 칸: {}",
        report.rows_read, report.rows_skipped, report.cells_parsed
    );
    for warning in &report.warnings {
        println!("  경고: {warning}");
    }
}

pub fn print_cover_report(report: &CoverBuildReport) {
    println!(
        "읽은 행: {}, 건너뛴 행: {}, 기록한 조합: {}",
        report.rows_read, report.rows_skipped, report.combinations
    );
    for warning in &report.warnings {
        println!("  경고: {warning}");
    }
}

pub fn print_axis_lookup(lookup: &AxisLookup) {
    match lookup {
        AxisLookup::Value(v) => {
            let note = if v.extrapolated { " (표 범위 밖, 외삽)" } else { "" };
            println!("최소 축거리 a = {:.2} mm{note}", v.a);
        }
        AxisLookup::NotComputable(reason) => println!("계산 불가: {reason}"),
    }
}
