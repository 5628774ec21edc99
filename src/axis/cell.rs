//! 표 한 칸의 구간점 문자열(`"150/30:200/25"`) 해석.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::breakpoint::{Breakpoint, BreakpointError, BreakpointList};

/// 자료 없음 표시.
pub const NULL_MARKER: &str = "NULL";
/// 구간점 사이 구분자.
pub const SEGMENT_SEPARATOR: char = ':';

/// 잘못된 구간 처리 방식. 한 번의 표 생성 중에는 하나만 쓴다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// 잘못된 구간이 하나라도 있으면 칸 전체를 거부
    #[default]
    Strict,
    /// 잘못된 구간은 건너뛰고 보고
    Permissive,
}

/// 셀 해석 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CellError {
    #[error("구간 형식 오류: '{segment}' (형식: <b>/<a>)")]
    MalformedSegment { segment: String },
    #[error(transparent)]
    Breakpoint(#[from] BreakpointError),
}

/// 해석 결과. `skipped`에는 관대 모드에서 버린 구간이 담긴다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedCell {
    pub breakpoints: BreakpointList,
    pub skipped: Vec<String>,
}

fn segment_regex() -> &'static Regex {
    static SEGMENT: OnceLock<Regex> = OnceLock::new();
    SEGMENT.get_or_init(|| {
        Regex::new(r"^\s*(\d+(?:\.\d+)?)\s*/\s*(\d+(?:\.\d+)?)\s*$").expect("고정 정규식")
    })
}

pub fn is_null_marker(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.eq_ignore_ascii_case(NULL_MARKER)
}

/// 셀 문자열을 `b_min` 오름차순 구간점 목록으로 바꾼다.
pub fn parse_cell(raw: &str, mode: ParseMode) -> Result<ParsedCell, CellError> {
    if is_null_marker(raw) {
        return Ok(ParsedCell::default());
    }
    let mut points = Vec::new();
    let mut skipped = Vec::new();
    for segment in raw.split(SEGMENT_SEPARATOR) {
        match parse_segment(segment) {
            Some(p) => points.push(p),
            None => match mode {
                ParseMode::Strict => {
                    return Err(CellError::MalformedSegment {
                        segment: segment.to_string(),
                    })
                }
                ParseMode::Permissive => skipped.push(segment.to_string()),
            },
        }
    }
    Ok(ParsedCell {
        breakpoints: BreakpointList::new(points)?,
        skipped,
    })
}

fn parse_segment(segment: &str) -> Option<Breakpoint> {
    let caps = segment_regex().captures(segment)?;
    let b_min = caps.get(1)?.as_str().parse().ok()?;
    let a = caps.get(2)?.as_str().parse().ok()?;
    Some(Breakpoint::new(b_min, a))
}
