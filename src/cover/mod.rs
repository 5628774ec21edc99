//! 노출 등급, 시멘트 종류, 강도 등급별 최소 피복 표.

pub mod builder;
pub mod codec;
pub mod table;

pub use builder::{
    build_cover_table, build_cover_table_from_path, CoverAxes, CoverBuildReport,
    CoverIngestionError, CoverRow, CoverTableBuilder, CoverWarning, CoverWarningKind,
};
pub use table::{CoverConflict, CoverDraft, CoverEntry, CoverLookup, CoverTable};
