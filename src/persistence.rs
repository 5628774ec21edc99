//! 조회표 저장 파일 공통 처리: 오류 형식, 원자적 쓰기, 중복 키를 남기는 JSON 객체 읽기.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::axis::BreakpointError;

/// 저장 파일 읽기/쓰기 오류. 재검증 실패는 새로 만들 때의 오류와 같이 치명적이다.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("입출력 오류 ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON 형식 오류: {0}")]
    Json(#[from] serde_json::Error),
    #[error("잘못된 키 '{key}': {reason}")]
    InvalidKey { key: String, reason: String },
    #[error("같은 값을 가리키는 키가 두 번 나옵니다: '{first}' / '{second}'")]
    DuplicateKey { first: String, second: String },
    #[error("잘못된 자료 표시 '{marker}' ({location}), NULL 또는 구간점 배열이어야 합니다")]
    InvalidMarker { marker: String, location: String },
    #[error("저장된 구간점 검증 실패 ({location}): {source}")]
    Breakpoint {
        location: String,
        #[source]
        source: BreakpointError,
    },
}

impl PersistenceError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// 읽기 전용 JSON 객체. 같은 키가 두 번 나와도 버리지 않고 나온 순서대로 모두 담는다.
/// 중복 판단은 키를 해석한 뒤 호출자가 한다.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedEntries<V>(pub Vec<(String, V)>);

impl<V> IntoIterator for KeyedEntries<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for KeyedEntries<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for EntriesVisitor<V> {
            type Value = KeyedEntries<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("JSON 객체")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, V>()? {
                    entries.push((key, value));
                }
                Ok(KeyedEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor(PhantomData))
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// 옆에 임시 파일을 쓴 뒤 이름을 바꿔 교체한다. 중간에 실패하면 기존 파일은 그대로다.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), PersistenceError> {
    let tmp = temp_path(path);
    let written = (|| {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(contents)?;
        writer.flush()?;
        writer.get_ref().sync_all()
    })();
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(PersistenceError::io(format!("임시 파일 쓰기 {}", tmp.display()), e));
    }
    fs::rename(&tmp, path)
        .map_err(|e| PersistenceError::io(format!("파일 교체 {}", path.display()), e))
}

pub fn read_to_string(path: &Path) -> Result<String, PersistenceError> {
    fs::read_to_string(path).map_err(|e| PersistenceError::io(format!("읽기 {}", path.display()), e))
}
