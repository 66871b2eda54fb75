use super::*;

#[test]
fn parses_ip_location_pair() {
    let coordinate: Coordinate = "40.7128,-74.0060".parse().expect("coordinate");
    assert_eq!(coordinate, Coordinate::new(40.7128, -74.006));
}

#[test]
fn rejects_malformed_location_pairs() {
    assert_eq!(
        "40.7".parse::<Coordinate>(),
        Err(CoordinateParseError::Shape("40.7".to_string()))
    );
    assert!(matches!(
        "north,-74".parse::<Coordinate>(),
        Err(CoordinateParseError::Component { axis: "lat", .. })
    ));
}

#[test]
fn coordinate_range_check() {
    assert!(Coordinate::new(90.0, -180.0).is_in_range());
    assert!(!Coordinate::new(91.0, 0.0).is_in_range());
}

#[test]
fn category_lookup_is_exact() {
    assert_eq!(Category::from_name("music"), Some(Category::Music));
    assert_eq!(Category::from_name("Music"), None);
    assert_eq!(Category::from_name(""), None);
    assert_eq!(Category::Film.segment_id(), "KZFzniwnSyZfZ7v7nn");
}

#[test]
fn event_id_serializes_as_plain_string() {
    let id = EventId::from("G5vYZ9");
    assert_eq!(serde_json::to_string(&id).expect("json"), "\"G5vYZ9\"");
}
