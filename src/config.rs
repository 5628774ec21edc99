use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::axis::{ParseMode, WidthPolicy};
use crate::category::{default_labels, CEMENT_TYPES, CONCRETE_GRADES, EXPOSURE_CLASSES};

/// 설정 파일 기본 이름.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// n 격자점 하나에 대응하는 원본 열.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadColumnConfig {
    /// 원본 머리글
    pub header: String,
    /// 이 열의 하중 수준 n
    pub n: f64,
}

impl LoadColumnConfig {
    pub fn new(header: impl Into<String>, n: f64) -> Self {
        Self {
            header: header.into(),
            n,
        }
    }
}

/// 축거리 원본 표의 열 구성.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisSourceConfig {
    pub fire_rating_column: String,
    pub omega_column: String,
    pub parse_mode: ParseMode,
    /// XLSX 시트 이름. 없으면 첫 시트.
    pub sheet: Option<String>,
    pub load_columns: Vec<LoadColumnConfig>,
}

impl Default for AxisSourceConfig {
    fn default() -> Self {
        Self {
            fire_rating_column: "Standard fire resistance".to_string(),
            omega_column: "Mechanical reinforcement ratio".to_string(),
            load_columns: vec![
                LoadColumnConfig::new("0.15", 0.15),
                LoadColumnConfig::new("0.3", 0.3),
                LoadColumnConfig::new("0.5", 0.5),
                LoadColumnConfig::new("0.7", 0.7),
            ],
            parse_mode: ParseMode::Strict,
            sheet: None,
        }
    }
}

/// 최소 피복 원본 표의 열 구성과 범주 열거.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverSourceConfig {
    pub exposure_column: String,
    pub cement_column: String,
    pub grade_column: String,
    pub cover_column: String,
    pub exposure_classes: Vec<String>,
    pub cement_types: Vec<String>,
    pub concrete_grades: Vec<String>,
    pub sheet: Option<String>,
}

impl Default for CoverSourceConfig {
    fn default() -> Self {
        Self {
            exposure_column: "Exposure Class".to_string(),
            cement_column: "Cement Type".to_string(),
            grade_column: "Concrete Grade".to_string(),
            cover_column: "Cover".to_string(),
            exposure_classes: default_labels(EXPOSURE_CLASSES),
            cement_types: default_labels(CEMENT_TYPES),
            concrete_grades: default_labels(CONCRETE_GRADES),
            sheet: None,
        }
    }
}

/// 조회 동작 설정.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub width_policy: WidthPolicy,
}

/// 기본 산출물 경로.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub axis_table: PathBuf,
    pub cover_table: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            axis_table: PathBuf::from("axis_lookup.json"),
            cover_table: PathBuf::from("cover_lookup.json"),
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub axis_source: AxisSourceConfig,
    pub cover_source: CoverSourceConfig,
    pub query: QueryConfig,
    pub paths: PathsConfig,
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save(path)?;
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 주어진 경로에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
