use std::fmt;

/// 1 단위 = 1/10000. ω, n 값은 이 고정소수점 격자에 맞춰 저장한다.
pub const KNOT_SCALE: i64 = 10_000;
const KNOT_DECIMALS: usize = 4;
/// 격자에서 벗어난 정도가 이보다 크면 반올림하지 않고 거부한다(상대 오차).
const GRID_TOLERANCE: f64 = 1e-6;

/// ω 또는 n 축의 표 값. 정수 고정소수점이라 비교와 키 문자열이 정확하다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Knot(i64);

impl Knot {
    /// 유한한 음이 아닌 값이고 소수 넷째 자리 격자 위에 있어야 한다.
    /// `0.12346`처럼 더 잘게 쓴 값은 다른 knot과 합쳐지지 않도록 `None`.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let exact = value * KNOT_SCALE as f64;
        let scaled = exact.round();
        if scaled > i64::MAX as f64 {
            return None;
        }
        if (exact - scaled).abs() > GRID_TOLERANCE * exact.abs().max(1.0) {
            return None;
        }
        Some(Self(scaled as i64))
    }

    /// 소수점 `.` 또는 `,`를 허용하는 숫자 라벨 해석.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        let normalized = if label.contains('.') {
            label.to_string()
        } else {
            label.replace(',', ".")
        };
        normalized.parse::<f64>().ok().and_then(Self::from_f64)
    }

    pub fn value(self) -> f64 {
        self.0 as f64 / KNOT_SCALE as f64
    }

    /// 저장 파일용 고정소수점 표기(`"0.1500"`).
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Knot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / KNOT_SCALE;
        let frac = self.0 % KNOT_SCALE;
        write!(f, "{whole}.{frac:0width$}", width = KNOT_DECIMALS)
    }
}
