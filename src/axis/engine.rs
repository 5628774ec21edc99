//! 축거리 보간 엔진.
//!
//! 순서: 내화 등급 직접 조회 → ω 구간 → ω 양 끝 각각에서 n 구간 → 네 모서리에서 `b`
//! 구간 선형 보간 → n 방향 → ω 방향. 범위 밖 ω, n은 가장자리 두 격자점으로
//! 선형 외삽한다. 한쪽 모서리만 값이 있으면 그 값을 그대로 쓴다.

use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::info;

use super::breakpoint::{lerp, WidthPolicy};
use super::knot::Knot;
use super::table::{AxisTable, LoadColumn};
use crate::fire_rating::FireRating;

/// 정확히 격자점 위에 있다고 보는 허용 오차.
const KNOT_TOLERANCE: f64 = 1e-9;

/// 보간 결과 값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisDistance {
    /// 최소 축거리 a (mm)
    pub a: f64,
    /// true면 ω, n, b 중 하나 이상이 표 범위 밖이라 외삽된 값이다.
    pub extrapolated: bool,
    /// 값에 기여한 모서리 수(최대 4).
    pub corners: usize,
}

/// 계산 불가 사유. 예외가 아니라 정상적인 결과이다.
#[derive(Debug, Clone, PartialEq)]
pub enum NotComputable {
    UnknownFireRating(String),
    NoDataInRegion {
        fire_rating: FireRating,
        omega: f64,
        n: f64,
        b: f64,
    },
    InvalidInput(&'static str),
}

impl fmt::Display for NotComputable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotComputable::UnknownFireRating(label) => {
                write!(f, "표에 없는 내화 등급: '{label}'")
            }
            NotComputable::NoDataInRegion {
                fire_rating,
                omega,
                n,
                b,
            } => write!(
                f,
                "해당 영역에 자료 없음: {fire_rating}, ω={omega}, n={n}, b={b}"
            ),
            NotComputable::InvalidInput(msg) => write!(f, "입력 오류: {msg}"),
        }
    }
}

/// 조회 결과.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisLookup {
    Value(AxisDistance),
    NotComputable(NotComputable),
}

impl AxisLookup {
    pub fn value(&self) -> Option<f64> {
        match self {
            AxisLookup::Value(v) => Some(v.a),
            AxisLookup::NotComputable(_) => None,
        }
    }

    pub fn is_computable(&self) -> bool {
        matches!(self, AxisLookup::Value(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Bracket {
    lo: usize,
    hi: usize,
    outside: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Partial {
    a: f64,
    extrapolated: bool,
    corners: usize,
}

/// 정렬된 격자에서 `x`를 감싸는 두 격자점. 범위 밖이면 가장자리 한 쌍.
fn bracket(knots: &[Knot], x: f64) -> Option<Bracket> {
    let last = knots.len().checked_sub(1)?;
    let value = |i: usize| knots[i].value();
    if last == 0 {
        return Some(Bracket {
            lo: 0,
            hi: 0,
            outside: (x - value(0)).abs() > KNOT_TOLERANCE,
        });
    }
    if x < value(0) - KNOT_TOLERANCE {
        return Some(Bracket {
            lo: 0,
            hi: 1,
            outside: true,
        });
    }
    if x > value(last) + KNOT_TOLERANCE {
        return Some(Bracket {
            lo: last - 1,
            hi: last,
            outside: true,
        });
    }
    let i = knots.partition_point(|k| k.value() < x - KNOT_TOLERANCE);
    if (value(i) - x).abs() <= KNOT_TOLERANCE {
        return Some(Bracket {
            lo: i,
            hi: i,
            outside: false,
        });
    }
    Some(Bracket {
        lo: i - 1,
        hi: i,
        outside: false,
    })
}

/// 두 격자점 결과를 합친다. 한쪽만 있으면 그 값을 쓴다.
fn combine(
    knots: &[Knot],
    br: Bracket,
    x: f64,
    lo: Option<Partial>,
    hi: Option<Partial>,
) -> Option<Partial> {
    let merged = match (lo, hi) {
        (Some(l), Some(_)) if br.lo == br.hi => l,
        (Some(l), Some(h)) => Partial {
            a: lerp(knots[br.lo].value(), l.a, knots[br.hi].value(), h.a, x),
            extrapolated: l.extrapolated || h.extrapolated,
            corners: l.corners + h.corners,
        },
        (Some(v), None) | (None, Some(v)) => v,
        (None, None) => return None,
    };
    Some(Partial {
        extrapolated: merged.extrapolated || br.outside,
        ..merged
    })
}

/// 읽기 전용 표 위에서 동작하는 조회 엔진. 내부 가변 상태가 없어 여러 스레드가
/// 같은 엔진을 동시에 써도 된다.
#[derive(Debug, Clone)]
pub struct AxisDistanceEngine {
    table: Arc<AxisTable>,
    width_policy: WidthPolicy,
}

impl AxisDistanceEngine {
    pub fn new(table: Arc<AxisTable>, width_policy: WidthPolicy) -> Self {
        Self {
            table,
            width_policy,
        }
    }

    pub fn table(&self) -> &Arc<AxisTable> {
        &self.table
    }

    pub fn width_policy(&self) -> WidthPolicy {
        self.width_policy
    }

    /// 문자열 내화 등급으로 조회한다. 해석할 수 없는 등급도 표에 없는 등급과 같이 처리한다.
    pub fn query(&self, fire_rating: &str, omega: f64, n: f64, b: f64) -> AxisLookup {
        match fire_rating.parse::<FireRating>() {
            Ok(rating) if self.table.grid(&rating).is_some() => {
                self.query_rating(&rating, omega, n, b)
            }
            _ => AxisLookup::NotComputable(NotComputable::UnknownFireRating(
                fire_rating.trim().to_string(),
            )),
        }
    }

    pub fn query_rating(&self, fire_rating: &FireRating, omega: f64, n: f64, b: f64) -> AxisLookup {
        if !(omega.is_finite() && n.is_finite() && b.is_finite()) {
            return AxisLookup::NotComputable(NotComputable::InvalidInput(
                "ω, n, b는 유한한 숫자여야 합니다.",
            ));
        }
        let Some(grid) = self.table.grid(fire_rating) else {
            return AxisLookup::NotComputable(NotComputable::UnknownFireRating(
                fire_rating.to_string(),
            ));
        };
        let knots = grid.omega_knots();
        let result = bracket(knots, omega).and_then(|br| {
            let at = |i: usize| grid.column(i).and_then(|c| self.at_column(c, n, b));
            let lo = at(br.lo);
            let hi = if br.hi == br.lo { lo } else { at(br.hi) };
            combine(knots, br, omega, lo, hi)
        });
        match result {
            Some(p) => AxisLookup::Value(AxisDistance {
                a: p.a,
                extrapolated: p.extrapolated,
                corners: p.corners,
            }),
            None => AxisLookup::NotComputable(NotComputable::NoDataInRegion {
                fire_rating: *fire_rating,
                omega,
                n,
                b,
            }),
        }
    }

    /// 한 ω 열에서 n 방향 보간.
    fn at_column(&self, column: &LoadColumn, n: f64, b: f64) -> Option<Partial> {
        let knots = column.n_knots();
        let br = bracket(knots, n)?;
        let corner = |i: usize| {
            column
                .cell(i)?
                .axis_distance_at(b, self.width_policy)
                .map(|w| Partial {
                    a: w.a,
                    extrapolated: w.outside,
                    corners: 1,
                })
        };
        let lo = corner(br.lo);
        let hi = if br.hi == br.lo { lo } else { corner(br.hi) };
        combine(knots, br, n, lo, hi)
    }
}

/// 현재 게시된 표를 들고 있는 자리. 재생성은 완성된 새 표를 한 번에 바꿔
/// 끼우는 방식으로만 한다. 이전 스냅샷을 든 조회는 그 표로 끝까지 진행된다.
#[derive(Debug)]
pub struct TableSlot {
    current: RwLock<Arc<AxisTable>>,
}

impl TableSlot {
    pub fn new(table: AxisTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    pub fn snapshot(&self) -> Arc<AxisTable> {
        let guard = self.current.read().unwrap_or_else(|p| p.into_inner());
        Arc::clone(&guard)
    }

    /// 새 표를 게시하고 이전 표를 돌려준다.
    pub fn publish(&self, table: AxisTable) -> Arc<AxisTable> {
        let next = Arc::new(table);
        let cells = next.len();
        let mut guard = self.current.write().unwrap_or_else(|p| p.into_inner());
        let previous = std::mem::replace(&mut *guard, next);
        drop(guard);
        info!(cells, "축거리 표 게시");
        previous
    }

    pub fn engine(&self, width_policy: WidthPolicy) -> AxisDistanceEngine {
        AxisDistanceEngine::new(self.snapshot(), width_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn knots(values: &[f64]) -> Vec<Knot> {
        values.iter().map(|&v| Knot::from_f64(v).unwrap()).collect()
    }

    #[test]
    fn bracket_inside_and_on_knot() {
        let k = knots(&[0.1, 0.5, 1.0]);
        assert_eq!(
            bracket(&k, 0.3),
            Some(Bracket {
                lo: 0,
                hi: 1,
                outside: false,
            })
        );
        assert_eq!(
            bracket(&k, 0.5),
            Some(Bracket {
                lo: 1,
                hi: 1,
                outside: false,
            })
        );
        assert_eq!(
            bracket(&k, 1.0),
            Some(Bracket {
                lo: 2,
                hi: 2,
                outside: false,
            })
        );
    }

    #[test]
    fn bracket_uses_edge_pair_outside() {
        let k = knots(&[0.1, 0.5, 1.0]);
        assert_eq!(
            bracket(&k, 0.05),
            Some(Bracket {
                lo: 0,
                hi: 1,
                outside: true,
            })
        );
        assert_eq!(
            bracket(&k, 1.2),
            Some(Bracket {
                lo: 1,
                hi: 2,
                outside: true,
            })
        );
    }

    #[test]
    fn bracket_single_and_empty() {
        let k = knots(&[0.15]);
        assert_eq!(
            bracket(&k, 0.15),
            Some(Bracket {
                lo: 0,
                hi: 0,
                outside: false,
            })
        );
        assert_eq!(
            bracket(&k, 0.4),
            Some(Bracket {
                lo: 0,
                hi: 0,
                outside: true,
            })
        );
        assert_eq!(bracket(&[], 0.4), None);
    }
}
