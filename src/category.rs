//! 순서가 있는 범주 축과 `시작:끝` 범위 라벨 전개.
//!
//! 원본 표는 병합 셀로 여러 범주를 한 칸에 `XC1:XC3`처럼 압축해 둔다.
//! 여기서는 그 라벨을 축의 열거 순서대로 풀어낸다.

use thiserror::Error;

/// 범위 라벨의 시작/끝 구분자.
pub const RANGE_SEPARATOR: char = ':';

/// 범주 라벨 전개 시 발생 가능한 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    /// 축 열거에 없는 라벨
    #[error("알 수 없는 범주: {axis} 축에 '{label}' 값이 없습니다")]
    Unknown { axis: String, label: String },
    /// 끝이 시작보다 앞서는 역순 범위
    #[error("역순 범위: {axis} 축에서 '{end}'이(가) '{start}'보다 앞에 있습니다")]
    Reversed {
        axis: String,
        start: String,
        end: String,
    },
}

/// 이름과 순서가 정해진 범주 값 목록.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryAxis {
    name: String,
    values: Vec<String>,
}

impl CategoryAxis {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// 라벨의 열거 위치. 앞뒤 공백은 무시한다.
    pub fn position(&self, label: &str) -> Option<usize> {
        let label = label.trim();
        self.values.iter().position(|v| v == label)
    }

    /// 단일 라벨 또는 `시작:끝` 범위를 양 끝 포함으로 전개한다.
    /// `NULL`이나 빈 라벨은 빈 목록이 된다.
    pub fn expand(&self, label: &str) -> Result<Vec<String>, CategoryError> {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case("NULL") {
            return Ok(Vec::new());
        }
        let (start, end) = match label.split_once(RANGE_SEPARATOR) {
            Some((s, e)) => (s.trim(), e.trim()),
            None => (label, label),
        };
        let s = self.require(start)?;
        let e = self.require(end)?;
        if e < s {
            return Err(CategoryError::Reversed {
                axis: self.name.clone(),
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(self.values[s..=e].to_vec())
    }

    fn require(&self, label: &str) -> Result<usize, CategoryError> {
        self.position(label).ok_or_else(|| CategoryError::Unknown {
            axis: self.name.clone(),
            label: label.to_string(),
        })
    }
}

/// EN 206 노출 등급 기본 순서.
pub const EXPOSURE_CLASSES: &[&str] = &[
    "XC1", "XC2", "XC3", "XC4", "XD1", "XD2", "XD3", "XS1", "XS2", "XS3",
];

/// 피복 표의 시멘트 종류 기본 순서.
pub const CEMENT_TYPES: &[&str] = &[
    "CEM I",
    "CEM II/A",
    "CEM II/B-S",
    "SRPC",
    "CEM II/B-V",
    "CEM III/A",
    "CEM III/B",
    "CEM IV/B",
];

/// 콘크리트 강도 등급 기본 순서.
pub const CONCRETE_GRADES: &[&str] = &[
    "C12/16", "C16/20", "C20/25", "C25/30", "C28/35", "C30/37", "C32/40", "C35/45", "C40/50",
    "C45/55", "C50/60", "C55/67", "C60/75", "C70/85", "C80/95", "C90/105",
];

pub fn default_labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
