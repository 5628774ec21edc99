use rc_fire_toolbox::axis::{parse_cell, Breakpoint, BreakpointError, CellError, ParseMode};

#[test]
fn parses_segments_in_width_order() {
    let cell = parse_cell("200/25:150/30", ParseMode::Strict).expect("valid cell");
    assert_eq!(
        cell.breakpoints.points(),
        &[Breakpoint::new(150.0, 30.0), Breakpoint::new(200.0, 25.0)]
    );
    assert!(cell.skipped.is_empty());
}

#[test]
fn tolerates_whitespace_and_decimals() {
    let cell = parse_cell(" 150 / 30.5 : 200/25 ", ParseMode::Strict).expect("valid cell");
    assert_eq!(cell.breakpoints.len(), 2);
    assert_eq!(cell.breakpoints.points()[0].a, 30.5);
}

#[test]
fn null_and_blank_are_empty() {
    for raw in ["NULL", "null", "", "   "] {
        let cell = parse_cell(raw, ParseMode::Strict).expect("null cell");
        assert!(cell.breakpoints.is_empty(), "raw={raw:?}");
    }
}

#[test]
fn strict_rejects_malformed_segment() {
    let err = parse_cell("150/30:abc", ParseMode::Strict).unwrap_err();
    assert_eq!(
        err,
        CellError::MalformedSegment {
            segment: "abc".to_string()
        }
    );
}

#[test]
fn permissive_skips_and_reports() {
    let cell = parse_cell("150/30:200-25:300/20", ParseMode::Permissive).expect("permissive");
    assert_eq!(cell.breakpoints.len(), 2);
    assert_eq!(cell.skipped, vec!["200-25".to_string()]);
}

#[test]
fn duplicate_width_is_rejected_in_both_modes() {
    for mode in [ParseMode::Strict, ParseMode::Permissive] {
        let err = parse_cell("150/30:150/35", mode).unwrap_err();
        assert_eq!(err, CellError::Breakpoint(BreakpointError::DuplicateWidth(150.0)));
    }
}

#[test]
fn negative_values_do_not_match_grammar() {
    assert!(parse_cell("-150/30", ParseMode::Strict).is_err());
}

#[test]
fn display_uses_cell_grammar() {
    let cell = parse_cell("150/30:200/25", ParseMode::Strict).expect("valid cell");
    assert_eq!(cell.breakpoints.to_string(), "150/30:200/25");
    let empty = parse_cell("NULL", ParseMode::Strict).expect("null");
    assert_eq!(empty.breakpoints.to_string(), "NULL");
}
