use std::io::Write;

use rc_fire_toolbox::axis::{
    build_axis_table, build_axis_table_from_path, AxisRow, AxisTableBuilder, Breakpoint,
    IngestionError, Knot, ParseMode, WarningKind,
};
use rc_fire_toolbox::category::CategoryError;
use rc_fire_toolbox::config::AxisSourceConfig;
use rc_fire_toolbox::fire_rating::FireRating;
use rc_fire_toolbox::source::SourceTable;

const HEADER: &str = "Standard fire resistance,Mechanical reinforcement ratio,0.15,0.3,0.5,0.7\n";

fn source(body: &str) -> SourceTable {
    let text = format!("{HEADER}{body}");
    SourceTable::from_csv_reader(text.as_bytes()).expect("csv")
}

fn knot(v: f64) -> Knot {
    Knot::from_f64(v).expect("knot")
}

fn rating(label: &str) -> FireRating {
    label.parse().expect("rating")
}

#[test]
fn carries_fire_rating_forward() {
    let src = source(
        "REI 90,0.1,150/30:200/25,NULL,NULL,NULL\n\
         ,0.5,150/35:200/28,NULL,NULL,NULL\n",
    );
    let (table, report) = build_axis_table(&src, &AxisSourceConfig::default()).expect("build");
    assert!(report.warnings.is_empty());
    assert_eq!(report.rows_read, 2);
    let cell = table
        .get(&rating("REI 90"), knot(0.5), knot(0.15))
        .expect("carried cell");
    assert_eq!(
        cell.points(),
        &[Breakpoint::new(150.0, 35.0), Breakpoint::new(200.0, 28.0)]
    );
    assert_eq!(table.len(), 8);
}

#[test]
fn range_label_fills_every_rating() {
    let src = source("R 30:R 60,0.1,150/30,NULL,NULL,NULL\n");
    let (table, _) = build_axis_table(&src, &AxisSourceConfig::default()).expect("build");
    let labels: Vec<String> = table.fire_ratings().map(|r| r.to_string()).collect();
    assert_eq!(labels, vec!["R 30", "R 45", "R 60"]);
}

#[test]
fn missing_or_bad_omega_skips_row_with_warning() {
    let src = source(
        "REI 60,,150/30,NULL,NULL,NULL\n\
         ,abc,150/30,NULL,NULL,NULL\n\
         ,0.2,150/30,NULL,NULL,NULL\n",
    );
    let (table, report) = build_axis_table(&src, &AxisSourceConfig::default()).expect("build");
    assert_eq!(report.rows_skipped, 2);
    assert_eq!(report.warnings[0].kind, WarningKind::MissingOmega);
    assert_eq!(report.warnings[0].line, 2);
    assert_eq!(
        report.warnings[1].kind,
        WarningKind::InvalidOmega {
            raw: "abc".to_string()
        }
    );
    assert!(table.get(&rating("REI 60"), knot(0.2), knot(0.15)).is_some());
}

#[test]
fn omega_finer_than_grid_is_skipped_not_merged() {
    let src = source(
        "REI 60,0.12346,150/30,NULL,NULL,NULL\n\
         ,0.12354,150/40,NULL,NULL,NULL\n\
         ,0.1235,150/35,NULL,NULL,NULL\n",
    );
    let (table, report) = build_axis_table(&src, &AxisSourceConfig::default()).expect("build");
    assert_eq!(report.rows_skipped, 2);
    assert_eq!(
        report.warnings[0].kind,
        WarningKind::InvalidOmega {
            raw: "0.12346".to_string()
        }
    );
    assert_eq!(report.warnings[1].line, 3);
    let cell = table
        .get(&rating("REI 60"), knot(0.1235), knot(0.15))
        .expect("cell");
    assert_eq!(cell.points(), &[Breakpoint::new(150.0, 35.0)]);
}

#[test]
fn load_column_off_grid_is_a_config_error() {
    let src = source("REI 60,0.1,150/30,NULL,NULL,NULL\n");
    let mut cfg = AxisSourceConfig::default();
    cfg.load_columns[0].n = 0.15001;
    let err = build_axis_table(&src, &cfg).unwrap_err();
    assert!(matches!(err, IngestionError::InvalidLoadColumn { .. }), "{err}");
}

#[test]
fn rows_before_any_rating_are_skipped() {
    let src = source(",0.1,150/30,NULL,NULL,NULL\n");
    let (table, report) = build_axis_table(&src, &AxisSourceConfig::default()).expect("build");
    assert!(table.is_empty());
    assert_eq!(report.warnings[0].kind, WarningKind::MissingFireRating);
}

#[test]
fn conflicting_duplicate_is_fatal() {
    let src = source(
        "REI 90,0.1,150/30,NULL,NULL,NULL\n\
         REI 60:REI 90,0.1,150/32,NULL,NULL,NULL\n",
    );
    let err = build_axis_table(&src, &AxisSourceConfig::default()).unwrap_err();
    match err {
        IngestionError::Conflict {
            line,
            fire_rating,
            omega,
            n,
            ..
        } => {
            assert_eq!(line, 3);
            assert_eq!(fire_rating, rating("REI 90"));
            assert_eq!(omega, knot(0.1));
            assert_eq!(n, knot(0.15));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn identical_duplicate_and_null_fill_are_accepted() {
    let src = source(
        "REI 90,0.1,150/30,NULL,NULL,NULL\n\
         ,0.1,150/30,200/40,NULL,NULL\n\
         ,0.1,NULL,NULL,NULL,NULL\n",
    );
    let (table, _) = build_axis_table(&src, &AxisSourceConfig::default()).expect("build");
    let r = rating("REI 90");
    assert_eq!(table.get(&r, knot(0.1), knot(0.15)).map(|c| c.len()), Some(1));
    assert_eq!(table.get(&r, knot(0.1), knot(0.3)).map(|c| c.len()), Some(1));
}

#[test]
fn reversed_rating_range_is_fatal() {
    let src = source("REI 120:REI 60,0.1,150/30,NULL,NULL,NULL\n");
    let err = build_axis_table(&src, &AxisSourceConfig::default()).unwrap_err();
    assert!(
        matches!(
            err,
            IngestionError::Category {
                line: 2,
                source: CategoryError::Reversed { .. },
                ..
            }
        ),
        "{err}"
    );
}

#[test]
fn strict_mode_rejects_bad_cell() {
    let src = source("REI 90,0.1,150/30:oops,NULL,NULL,NULL\n");
    let err = build_axis_table(&src, &AxisSourceConfig::default()).unwrap_err();
    assert!(matches!(err, IngestionError::Cell { line: 2, .. }), "{err}");
}

#[test]
fn permissive_mode_reports_skipped_segments() {
    let src = source("REI 90,0.1,150/30:oops,NULL,NULL,NULL\n");
    let cfg = AxisSourceConfig {
        parse_mode: ParseMode::Permissive,
        ..AxisSourceConfig::default()
    };
    let (table, report) = build_axis_table(&src, &cfg).expect("build");
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(
        &report.warnings[0].kind,
        WarningKind::SkippedSegments { segments, .. } if segments == &vec!["oops".to_string()]
    ));
    assert_eq!(
        table
            .get(&rating("REI 90"), knot(0.1), knot(0.15))
            .map(|c| c.len()),
        Some(1)
    );
}

#[test]
fn missing_configured_column_is_reported() {
    let src = SourceTable::from_csv_reader("Rating,Omega\nREI 90,0.1\n".as_bytes()).expect("csv");
    let err = build_axis_table(&src, &AxisSourceConfig::default()).unwrap_err();
    assert!(matches!(err, IngestionError::MissingColumn { .. }), "{err}");
}

#[test]
fn row_builder_accepts_structured_rows() {
    let mut builder = AxisTableBuilder::new(vec![knot(0.15), knot(0.7)], ParseMode::Strict);
    builder
        .push_row(AxisRow {
            line: 1,
            fire_rating: "EI 30",
            omega: "0,1",
            loads: &["150/30", "200/40"],
        })
        .expect("row");
    let (table, report) = builder.finish();
    assert_eq!(report.cells_parsed, 2);
    assert!(table.get(&rating("EI 30"), knot(0.1), knot(0.7)).is_some());
}

#[test]
fn reads_csv_file_with_bom() {
    let mut file = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .expect("temp file");
    write!(file, "\u{feff}{HEADER}REI 90,0.1,150/30,NULL,NULL,NULL\n").expect("write");
    file.flush().expect("flush");
    let (table, _) =
        build_axis_table_from_path(file.path(), &AxisSourceConfig::default()).expect("build");
    assert_eq!(table.len(), 4);
}
