//! 원본 표(CSV/XLSX)를 머리글 + 문자열 행으로 읽는다.
//!
//! XLSX 병합 셀은 왼쪽 위 칸에만 값이 있고 나머지는 빈 칸으로 읽힌다.
//! 빈 칸 이어받기는 표 생성기가 처리한다.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use thiserror::Error;

/// 원본 표 읽기 오류.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("원본 파일 입출력 오류 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV 읽기 오류: {0}")]
    Csv(#[from] csv::Error),
    #[error("XLSX 읽기 오류: {0}")]
    Xlsx(#[from] calamine::XlsxError),
    #[error("시트를 찾을 수 없음: {0}")]
    SheetNotFound(String),
    #[error("머리글 행이 없습니다")]
    Empty,
    #[error("지원하지 않는 원본 형식: {0} (csv, xlsx, xlsm)")]
    UnsupportedFormat(String),
}

/// 원본 한 행. `line`은 원본 파일 기준 1부터의 행 번호이다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    pub line: usize,
    pub cells: Vec<String>,
}

impl SourceRow {
    /// 열 범위를 벗어나면 빈 칸으로 본다.
    pub fn get(&self, column: usize) -> &str {
        self.cells.get(column).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTable {
    headers: Vec<String>,
    rows: Vec<SourceRow>,
}

impl SourceTable {
    pub fn new(headers: Vec<String>, rows: Vec<SourceRow>) -> Self {
        let headers = headers
            .into_iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        Self { headers, rows }
    }

    /// 확장자로 형식을 고른다. XLSX는 `sheet`가 없으면 첫 시트를 쓴다.
    pub fn open(path: &Path, sheet: Option<&str>) -> Result<Self, SourceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Self::from_csv_path(path),
            "xlsx" | "xlsm" => Self::from_xlsx_path(path, sheet),
            _ => Err(SourceError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_csv_reader(file)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, SourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        if headers.is_empty() {
            return Err(SourceError::Empty);
        }
        let mut rows = Vec::new();
        for (idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            rows.push(SourceRow {
                line,
                cells: record.iter().map(str::to_string).collect(),
            });
        }
        Ok(Self::new(headers, rows))
    }

    pub fn from_xlsx_path(path: &Path, sheet: Option<&str>) -> Result<Self, SourceError> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;
        let name = match sheet {
            Some(name) => name.to_string(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or(SourceError::Empty)?,
        };
        if !workbook.sheet_names().iter().any(|s| *s == name) {
            return Err(SourceError::SheetNotFound(name));
        }
        let range = workbook.worksheet_range(&name)?;
        let first_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);
        let mut iter = range.rows();
        let headers = iter
            .next()
            .ok_or(SourceError::Empty)?
            .iter()
            .map(data_to_string)
            .collect();
        let rows = iter
            .enumerate()
            .map(|(i, row)| SourceRow {
                line: first_row + i + 2,
                cells: row.iter().map(data_to_string).collect(),
            })
            .collect();
        Ok(Self::new(headers, rows))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[SourceRow] {
        &self.rows
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        let header = header.trim();
        self.headers.iter().position(|h| h == header)
    }
}

fn data_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("{e:?}"),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
