//! 내화 설계 최소 축거리 표(ω, n, b 보간) 모듈 모음.

pub mod breakpoint;
pub mod builder;
pub mod cell;
pub mod codec;
pub mod engine;
pub mod knot;
pub mod table;

pub use breakpoint::{Breakpoint, BreakpointError, BreakpointList, WidthPolicy, WidthValue};
pub use builder::{
    build_axis_table, build_axis_table_from_path, AxisRow, AxisTableBuilder, BuildReport,
    IngestionError, IngestionWarning, WarningKind,
};
pub use cell::{parse_cell, CellError, ParseMode, ParsedCell};
pub use engine::{AxisDistance, AxisDistanceEngine, AxisLookup, NotComputable, TableSlot};
pub use knot::Knot;
pub use table::{AxisTable, Conflict, Insertion, LoadColumn, RatingGrid, TableDraft, TableEntry};
