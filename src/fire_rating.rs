//! 내화 등급(R/EI/REI + 표준 시간)의 고정 열거.
//!
//! 내화 등급은 보간 대상이 아닌 범주 축이다. `"REI 90"`과 `"REI90"`은 같은
//! 등급으로 취급하며 표시 형식은 항상 `"REI 90"`이다.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::category::{CategoryAxis, CategoryError, RANGE_SEPARATOR};

/// 표준 내화 시간(분). EN 13501-2 분류 기준.
pub const STANDARD_DURATIONS: [u16; 10] = [15, 20, 30, 45, 60, 90, 120, 180, 240, 360];

const FIRE_RATING_AXIS: &str = "내화 등급";

/// 내화 성능 기준(하중지지/차염/차열 조합).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResistanceClass {
    R,
    E,
    EI,
    RE,
    REI,
    REW,
    EW,
}

impl ResistanceClass {
    pub const ALL: [ResistanceClass; 7] = [
        ResistanceClass::R,
        ResistanceClass::E,
        ResistanceClass::EI,
        ResistanceClass::RE,
        ResistanceClass::REI,
        ResistanceClass::REW,
        ResistanceClass::EW,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ResistanceClass::R => "R",
            ResistanceClass::E => "E",
            ResistanceClass::EI => "EI",
            ResistanceClass::RE => "RE",
            ResistanceClass::REI => "REI",
            ResistanceClass::REW => "REW",
            ResistanceClass::EW => "EW",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.symbol().eq_ignore_ascii_case(symbol))
    }
}

/// 내화 등급 문자열 해석 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FireRatingError {
    #[error("내화 등급 형식 오류: '{0}'")]
    Malformed(String),
    #[error("알 수 없는 내화 기준: '{0}'")]
    UnknownClass(String),
    #[error("표준 내화 시간이 아님: '{label}' ({minutes}분)")]
    NonStandardDuration { label: String, minutes: u32 },
}

/// 내화 기준과 표준 시간의 조합.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FireRating {
    class: ResistanceClass,
    minutes: u16,
}

impl FireRating {
    pub fn new(class: ResistanceClass, minutes: u16) -> Result<Self, FireRatingError> {
        if !STANDARD_DURATIONS.contains(&minutes) {
            return Err(FireRatingError::NonStandardDuration {
                label: format!("{} {minutes}", class.symbol()),
                minutes: u32::from(minutes),
            });
        }
        Ok(Self { class, minutes })
    }

    pub fn class(&self) -> ResistanceClass {
        self.class
    }

    pub fn minutes(&self) -> u16 {
        self.minutes
    }

    /// 한 내화 기준의 표준 시간 축. 범위 라벨 전개에 쓴다.
    pub fn scale(class: ResistanceClass) -> CategoryAxis {
        CategoryAxis::new(
            FIRE_RATING_AXIS,
            STANDARD_DURATIONS
                .iter()
                .map(|m| format!("{} {m}", class.symbol())),
        )
    }

    /// `"REI 60"` 또는 `"REI 60:REI 120"` 라벨을 등급 목록으로 전개한다.
    /// 범위는 시작 등급의 기준 축 위에서만 유효하다.
    pub fn expand_label(label: &str) -> Result<Vec<FireRating>, CategoryError> {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case("NULL") {
            return Ok(Vec::new());
        }
        let (start_raw, end_raw) = match label.split_once(RANGE_SEPARATOR) {
            Some((s, e)) => (s.trim(), Some(e.trim())),
            None => (label, None),
        };
        let start: FireRating = start_raw.parse().map_err(|_| CategoryError::Unknown {
            axis: FIRE_RATING_AXIS.to_string(),
            label: start_raw.to_string(),
        })?;
        let canonical = match end_raw {
            Some(end) => {
                let end = end
                    .parse::<FireRating>()
                    .map(|r| r.to_string())
                    .unwrap_or_else(|_| end.to_string());
                format!("{start}{RANGE_SEPARATOR}{end}")
            }
            None => start.to_string(),
        };
        Self::scale(start.class)
            .expand(&canonical)?
            .iter()
            .map(|l| {
                l.parse().map_err(|_| CategoryError::Unknown {
                    axis: FIRE_RATING_AXIS.to_string(),
                    label: l.clone(),
                })
            })
            .collect()
    }
}

impl FromStr for FireRating {
    type Err = FireRatingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let split = compact
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| FireRatingError::Malformed(s.to_string()))?;
        let (symbol, digits) = compact.split_at(split);
        if symbol.is_empty() {
            return Err(FireRatingError::Malformed(s.to_string()));
        }
        let class = ResistanceClass::from_symbol(symbol)
            .ok_or_else(|| FireRatingError::UnknownClass(symbol.to_string()))?;
        let minutes: u32 = digits
            .parse()
            .map_err(|_| FireRatingError::Malformed(s.to_string()))?;
        let standard = u16::try_from(minutes)
            .ok()
            .filter(|m| STANDARD_DURATIONS.contains(m))
            .ok_or_else(|| FireRatingError::NonStandardDuration {
                label: s.trim().to_string(),
                minutes,
            })?;
        Ok(Self {
            class,
            minutes: standard,
        })
    }
}

impl fmt::Display for FireRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.class.symbol(), self.minutes)
    }
}
