use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 최소 단면 치수 `b_min`(mm)과 그에 대응하는 최소 축거리 `a`(mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    #[serde(rename = "b")]
    pub b_min: f64,
    pub a: f64,
}

impl Breakpoint {
    pub const fn new(b_min: f64, a: f64) -> Self {
        Self { b_min, a }
    }
}

/// 구간점 목록 불변식 위반.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BreakpointError {
    #[error("유한한 0 이상 값이어야 합니다: b={b_min}, a={a}")]
    InvalidValue { b_min: f64, a: f64 },
    #[error("같은 폭이 두 번 나옵니다: b={0}")]
    DuplicateWidth(f64),
    #[error("폭이 증가 순서가 아닙니다: b={previous} 다음 b={next}")]
    NotIncreasing { previous: f64, next: f64 },
}

/// 표 범위 밖 폭(`b`)의 처리 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthPolicy {
    /// 끝 구간의 기울기로 선형 외삽
    #[default]
    Extrapolate,
    /// 가장자리 값으로 고정
    Clamp,
}

/// 폭 보간 결과.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidthValue {
    pub a: f64,
    /// true면 구간점 범위 밖이라 외삽/고정된 값이다.
    pub outside: bool,
}

/// 한 격자점(ω, n)의 구간점 목록. `b_min`이 엄격히 증가한다.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BreakpointList(Vec<Breakpoint>);

impl BreakpointList {
    /// 자료 없음(`NULL`).
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// 폭 순으로 정렬한 뒤 검증한다.
    pub fn new(mut points: Vec<Breakpoint>) -> Result<Self, BreakpointError> {
        validate_values(&points)?;
        points.sort_by(|l, r| l.b_min.total_cmp(&r.b_min));
        if let Some(pair) = points.windows(2).find(|w| w[0].b_min == w[1].b_min) {
            return Err(BreakpointError::DuplicateWidth(pair[0].b_min));
        }
        Ok(Self(points))
    }

    /// 이미 정렬되어 있어야 하는 목록(저장 파일 등)을 재정렬 없이 검증한다.
    pub fn from_sorted(points: Vec<Breakpoint>) -> Result<Self, BreakpointError> {
        validate_values(&points)?;
        for w in points.windows(2) {
            if w[0].b_min == w[1].b_min {
                return Err(BreakpointError::DuplicateWidth(w[0].b_min));
            }
            if w[0].b_min > w[1].b_min {
                return Err(BreakpointError::NotIncreasing {
                    previous: w[0].b_min,
                    next: w[1].b_min,
                });
            }
        }
        Ok(Self(points))
    }

    pub fn points(&self) -> &[Breakpoint] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 폭 `b`에서의 축거리. 빈 목록이면 `None`.
    pub fn axis_distance_at(&self, b: f64, policy: WidthPolicy) -> Option<WidthValue> {
        let points = &self.0;
        let (first, last) = (points.first()?, points.last()?);
        // 점이 하나면 모든 b에서 같은 값이다
        if points.len() == 1 {
            return Some(WidthValue {
                a: first.a,
                outside: false,
            });
        }
        if let Some(hit) = points.iter().find(|p| p.b_min == b) {
            return Some(WidthValue {
                a: hit.a,
                outside: false,
            });
        }
        let below = b < first.b_min;
        let above = b > last.b_min;
        if below || above {
            let a = match policy {
                WidthPolicy::Clamp if below => first.a,
                WidthPolicy::Clamp => last.a,
                WidthPolicy::Extrapolate => {
                    let (p0, p1) = if below {
                        (points[0], points[1])
                    } else {
                        (points[points.len() - 2], points[points.len() - 1])
                    };
                    lerp(p0.b_min, p0.a, p1.b_min, p1.a, b)
                }
            };
            return Some(WidthValue { a, outside: true });
        }
        let i = points.partition_point(|p| p.b_min < b);
        let (p0, p1) = (points[i - 1], points[i]);
        Some(WidthValue {
            a: lerp(p0.b_min, p0.a, p1.b_min, p1.a, b),
            outside: false,
        })
    }
}

/// 원본 셀 문법(`150/30:200/25`, 빈 목록은 `NULL`)으로 표시한다.
impl fmt::Display for BreakpointList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("NULL");
        }
        for (i, p) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{}/{}", p.b_min, p.a)?;
        }
        Ok(())
    }
}

fn validate_values(points: &[Breakpoint]) -> Result<(), BreakpointError> {
    match points
        .iter()
        .find(|p| !(p.b_min.is_finite() && p.a.is_finite() && p.b_min >= 0.0 && p.a >= 0.0))
    {
        Some(p) => Err(BreakpointError::InvalidValue {
            b_min: p.b_min,
            a: p.a,
        }),
        None => Ok(()),
    }
}

/// (x0, y0)-(x1, y1) 직선 보간. 구간 폭이 0이면 y0를 그대로 쓴다.
pub(crate) fn lerp(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> f64 {
    let dx = x1 - x0;
    if dx.abs() <= f64::EPSILON {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / dx
}
