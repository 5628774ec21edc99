use rc_fire_toolbox::category::{CategoryAxis, CategoryError, EXPOSURE_CLASSES};
use rc_fire_toolbox::fire_rating::{FireRating, FireRatingError, ResistanceClass};

fn exposures() -> CategoryAxis {
    CategoryAxis::new("노출 등급", EXPOSURE_CLASSES.iter().copied())
}

#[test]
fn range_expands_inclusive_in_order() {
    let values = exposures().expand("XC2:XD1").expect("range");
    assert_eq!(values, vec!["XC2", "XC3", "XC4", "XD1"]);
}

#[test]
fn single_label_and_null() {
    let axis = exposures();
    assert_eq!(axis.expand(" XS3 ").expect("single"), vec!["XS3"]);
    assert!(axis.expand("NULL").expect("null").is_empty());
    assert!(axis.expand("").expect("blank").is_empty());
}

#[test]
fn unknown_endpoint_is_an_error() {
    let err = exposures().expand("XC1:XZ9").unwrap_err();
    assert_eq!(
        err,
        CategoryError::Unknown {
            axis: "노출 등급".to_string(),
            label: "XZ9".to_string()
        }
    );
}

#[test]
fn reversed_range_is_an_error() {
    let err = exposures().expand("XD3:XC1").unwrap_err();
    assert!(matches!(err, CategoryError::Reversed { .. }), "{err:?}");
}

#[test]
fn fire_rating_ignores_spacing() {
    let a: FireRating = "REI90".parse().expect("rating");
    let b: FireRating = " REI 90 ".parse().expect("rating");
    assert_eq!(a, b);
    assert_eq!(a.to_string(), "REI 90");
    assert_eq!(a.class(), ResistanceClass::REI);
    assert_eq!(a.minutes(), 90);
}

#[test]
fn fire_rating_rejects_non_standard() {
    assert!(matches!(
        "REI999".parse::<FireRating>(),
        Err(FireRatingError::NonStandardDuration { minutes: 999, .. })
    ));
    assert!(matches!(
        "XYZ 60".parse::<FireRating>(),
        Err(FireRatingError::UnknownClass(_))
    ));
    assert!(matches!(
        "REI".parse::<FireRating>(),
        Err(FireRatingError::Malformed(_))
    ));
}

#[test]
fn fire_rating_range_covers_standard_durations() {
    let ratings = FireRating::expand_label("REI 30:REI60").expect("range");
    let labels: Vec<String> = ratings.iter().map(|r| r.to_string()).collect();
    assert_eq!(labels, vec!["REI 30", "REI 45", "REI 60"]);
}

#[test]
fn fire_rating_range_must_stay_in_one_class() {
    let err = FireRating::expand_label("REI 30:EI 60").unwrap_err();
    assert!(matches!(err, CategoryError::Unknown { .. }), "{err:?}");
    let err = FireRating::expand_label("REI 120:REI 60").unwrap_err();
    assert!(matches!(err, CategoryError::Reversed { .. }), "{err:?}");
}
