use rc_fire_toolbox::axis::{build_axis_table, codec, AxisTable, Knot};
use rc_fire_toolbox::config::AxisSourceConfig;
use rc_fire_toolbox::fire_rating::FireRating;
use rc_fire_toolbox::persistence::PersistenceError;
use rc_fire_toolbox::source::SourceTable;

const TABLE: &str = "\
Standard fire resistance,Mechanical reinforcement ratio,0.15,0.3,0.5,0.7
REI 90,0.1,150/30:200/25,NULL,200/40:300/35,NULL
,0.5,150/35:200/28,NULL,200/45:300/38,NULL
EI 60:EI 90,0.25,160/20,NULL,NULL,300/15
";

fn sample() -> AxisTable {
    let src = SourceTable::from_csv_reader(TABLE.as_bytes()).expect("csv");
    build_axis_table(&src, &AxisSourceConfig::default())
        .expect("build")
        .0
}

#[test]
fn json_round_trip_reproduces_table() {
    let table = sample();
    let json = codec::to_json(&table).expect("serialize");
    let restored = codec::from_json(&json).expect("deserialize");
    assert_eq!(restored, table);
}

#[test]
fn keys_are_fixed_point_and_null_is_marked() {
    let json = codec::to_json(&sample()).expect("serialize");
    let doc: serde_json::Value = serde_json::from_str(&json).expect("json");
    let cell = &doc["REI 90"]["omega"]["0.1000"]["n"]["0.1500"];
    assert_eq!(cell[0]["b"], 150.0);
    assert_eq!(cell[0]["a"], 30.0);
    assert_eq!(doc["REI 90"]["omega"]["0.1000"]["n"]["0.3000"], "NULL");
    assert!(doc["EI 75"].is_null());
    assert!(doc["EI 60"].is_object());
}

#[test]
fn alternative_key_spelling_is_accepted() {
    let json = r#"{ "REI90": { "omega": { "0.1": { "n": { "0,15": [{"b": 150, "a": 30}] } } } } }"#;
    let table = codec::from_json(json).expect("deserialize");
    let rating: FireRating = "REI 90".parse().expect("rating");
    let cell = table
        .get(
            &rating,
            Knot::from_f64(0.1).expect("knot"),
            Knot::from_f64(0.15).expect("knot"),
        )
        .expect("cell");
    assert_eq!(cell.len(), 1);
}

#[test]
fn keys_resolving_to_same_knot_are_rejected() {
    let json = r#"{ "REI 90": { "omega": {
        "0.1": { "n": { "0.1500": "NULL" } },
        "0.1000": { "n": { "0.1500": "NULL" } }
    } } }"#;
    let err = codec::from_json(json).unwrap_err();
    assert!(matches!(err, PersistenceError::DuplicateKey { .. }), "{err}");
}

#[test]
fn ratings_resolving_to_same_class_are_rejected() {
    let json = r#"{ "REI 90": { "omega": {} }, "REI90": { "omega": {} } }"#;
    let err = codec::from_json(json).unwrap_err();
    assert!(matches!(err, PersistenceError::DuplicateKey { .. }), "{err}");
}

#[test]
fn repeated_identical_keys_are_rejected() {
    let load_twice = r#"{ "REI 90": { "omega": { "0.1500": { "n": {
        "0.1500": [{"b": 150, "a": 30}],
        "0.1500": [{"b": 150, "a": 45}]
    } } } } }"#;
    let err = codec::from_json(load_twice).unwrap_err();
    match &err {
        PersistenceError::DuplicateKey { first, second } => {
            assert_eq!(first, "0.1500");
            assert_eq!(second, "0.1500");
        }
        other => panic!("{other}"),
    }

    let omega_twice = r#"{ "REI 90": { "omega": {
        "0.1000": { "n": { "0.1500": "NULL" } },
        "0.1000": { "n": { "0.3000": "NULL" } }
    } } }"#;
    assert!(matches!(
        codec::from_json(omega_twice),
        Err(PersistenceError::DuplicateKey { .. })
    ));

    let rating_twice = r#"{ "REI 90": { "omega": {} }, "REI 90": { "omega": {} } }"#;
    assert!(matches!(
        codec::from_json(rating_twice),
        Err(PersistenceError::DuplicateKey { .. })
    ));
}

#[test]
fn knot_keys_finer_than_four_decimals_are_rejected() {
    let json = r#"{ "REI 90": { "omega": { "0.12345": { "n": { "0.1500": "NULL" } } } } }"#;
    let err = codec::from_json(json).unwrap_err();
    assert!(
        matches!(&err, PersistenceError::InvalidKey { key, .. } if key == "0.12345"),
        "{err}"
    );
}

#[test]
fn unsorted_breakpoints_fail_validation() {
    let json = r#"{ "REI 90": { "omega": { "0.1000": { "n": {
        "0.1500": [{"b": 200, "a": 25}, {"b": 150, "a": 30}]
    } } } } }"#;
    let err = codec::from_json(json).unwrap_err();
    assert!(matches!(err, PersistenceError::Breakpoint { .. }), "{err}");
}

#[test]
fn unknown_marker_is_rejected() {
    let json = r#"{ "REI 90": { "omega": { "0.1000": { "n": { "0.1500": "N/A" } } } } }"#;
    let err = codec::from_json(json).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidMarker { .. }), "{err}");
}

#[test]
fn invalid_keys_are_rejected() {
    let bad_rating = r#"{ "REI 999": { "omega": {} } }"#;
    assert!(matches!(
        codec::from_json(bad_rating),
        Err(PersistenceError::InvalidKey { .. })
    ));
    let bad_knot = r#"{ "REI 90": { "omega": { "-0.1": { "n": {} } } } }"#;
    assert!(matches!(
        codec::from_json(bad_knot),
        Err(PersistenceError::InvalidKey { .. })
    ));
    assert!(matches!(
        codec::from_json("not json"),
        Err(PersistenceError::Json(_))
    ));
}

#[test]
fn save_and_load_through_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("axis_lookup.json");
    let table = sample();
    codec::save(&path, &table).expect("save");
    assert!(!dir.path().join("axis_lookup.json.tmp").exists());
    let loaded = codec::load(&path).expect("load");
    assert_eq!(loaded, table);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = codec::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, PersistenceError::Io { .. }), "{err}");
}
