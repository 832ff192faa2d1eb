//! Detection zone tests

use intersection_sim::simulation::{
    Direction, DetectionZones, Position, TurnIntent, Vehicle, VehicleId, CENTER_X, CENTER_Y,
    DEFAULT_DETECTOR_DISTANCE, MAX_DETECTOR_DISTANCE, MIN_DETECTOR_DISTANCE,
};

/// A stopped North vehicle parked inside the default North zone
fn waiting_north_vehicle(id: usize, wait_time: f32) -> Vehicle {
    let mut v = Vehicle::new(VehicleId(id), Direction::North, TurnIntent::Straight, 25.0);
    v.advance(280.0);
    v.wait_time = wait_time;
    v
}

#[test]
fn test_default_zone_extents() {
    let zones = DetectionZones::default();
    assert_eq!(zones.detector_distance(), DEFAULT_DETECTOR_DISTANCE);

    let north = zones.zone(Direction::North).rect;
    assert!((north.min_x - (CENTER_X - 40.0)).abs() < 1e-3);
    assert!((north.max_x - (CENTER_X + 40.0)).abs() < 1e-3);
    assert!((north.min_y - (CENTER_Y + 160.0)).abs() < 1e-3);
    assert!((north.max_y - (CENTER_Y + 180.0)).abs() < 1e-3);
    assert!((north.width() - 80.0).abs() < 1e-3);

    let east = zones.zone(Direction::East).rect;
    assert!((east.min_x - (CENTER_X - 180.0)).abs() < 1e-3);
    assert!((east.max_x - (CENTER_X - 160.0)).abs() < 1e-3);
    assert!((east.height() - 80.0).abs() < 1e-3);
}

#[test]
fn test_detector_distance_is_clamped() {
    let mut zones = DetectionZones::default();

    zones.set_detector_distance(500.0);
    assert_eq!(zones.detector_distance(), MAX_DETECTOR_DISTANCE);
    let south = zones.zone(Direction::South).rect;
    assert!((south.max_y - (CENTER_Y - 80.0 - MAX_DETECTOR_DISTANCE)).abs() < 1e-3);

    zones.set_detector_distance(5.0);
    assert_eq!(zones.detector_distance(), MIN_DETECTOR_DISTANCE);

    assert_eq!(DetectionZones::new(-1.0).detector_distance(), MIN_DETECTOR_DISTANCE);
}

#[test]
fn test_waiting_vehicle_feeds_priority_data() {
    let vehicles = vec![waiting_north_vehicle(0, 10.0), waiting_north_vehicle(1, 6.0)];
    let mut zones = DetectionZones::default();
    zones.scan(&vehicles);

    let data = zones.zone(Direction::North).priority_data();
    assert_eq!(data.waiting_count, 2);
    assert_eq!(data.detected, 2);
    assert!((data.average_wait - 8.0).abs() < 1e-5);

    for direction in [Direction::East, Direction::South, Direction::West] {
        assert_eq!(zones.zone(direction).detected_count(), 0);
        assert_eq!(zones.zone(direction).priority_data().average_wait, 0.0);
    }
}

#[test]
fn test_zone_only_sees_its_own_direction() {
    let mut intruder = Vehicle::new(VehicleId(7), Direction::East, TurnIntent::Straight, 25.0);
    intruder.position = Position::new(CENTER_X, CENTER_Y + 170.0);

    let mut zones = DetectionZones::default();
    zones.scan(&[intruder]);
    assert!(zones.counts().iter().all(|c| c.detected == 0));
}

#[test]
fn test_scan_matches_sees_for_mixed_traffic() {
    let mut east_in_band = Vehicle::new(VehicleId(2), Direction::East, TurnIntent::Straight, 25.0);
    east_in_band.position = Position::new(CENTER_X - 170.0, CENTER_Y - 20.0);
    let mut north_upstream = waiting_north_vehicle(3, 1.0);
    north_upstream.position.y += 100.0;

    let vehicles = vec![
        waiting_north_vehicle(0, 4.0),
        waiting_north_vehicle(1, 2.0),
        east_in_band,
        north_upstream,
    ];
    let mut zones = DetectionZones::default();
    zones.scan(&vehicles);

    for direction in Direction::ALL {
        let zone = zones.zone(direction);
        let expected = vehicles.iter().filter(|v| zone.sees(v)).count();
        assert_eq!(zone.detected_count(), expected, "{direction}");
    }
    assert_eq!(zones.zone(Direction::North).detected_count(), 2);
    assert_eq!(zones.zone(Direction::East).detected_count(), 1);
    let ids: Vec<VehicleId> = zones
        .zone(Direction::North)
        .detected()
        .iter()
        .map(|d| d.id)
        .collect();
    assert_eq!(ids, vec![VehicleId(0), VehicleId(1)]);
}

#[test]
fn test_moving_vehicle_is_detected_but_not_waiting() {
    let mut v = waiting_north_vehicle(0, 0.0);
    v.speed = 12.0;

    let mut zones = DetectionZones::default();
    zones.scan(&[v]);

    let counts = zones.zone(Direction::North).counts();
    assert_eq!(counts.detected, 1);
    assert_eq!(counts.waiting, 0);
    assert_eq!(zones.priority_data()[Direction::North.index()].waiting_count, 0);
}

#[test]
fn test_scan_replaces_previous_contents() {
    let mut zones = DetectionZones::default();
    zones.scan(&[waiting_north_vehicle(0, 3.0)]);
    assert_eq!(zones.zone(Direction::North).detected_count(), 1);

    zones.scan(&[]);
    assert_eq!(zones.zone(Direction::North).detected_count(), 0);
}

#[test]
fn test_moving_zone_loses_vehicle() {
    let vehicles = vec![waiting_north_vehicle(0, 3.0)];
    let mut zones = DetectionZones::default();

    zones.set_detector_distance(140.0);
    zones.scan(&vehicles);
    assert_eq!(zones.zone(Direction::North).detected_count(), 0);

    zones.set_detector_distance(DEFAULT_DETECTOR_DISTANCE);
    zones.scan(&vehicles);
    assert_eq!(zones.zone(Direction::North).detected_count(), 1);

    zones.reset();
    assert_eq!(zones.zone(Direction::North).detected_count(), 0);
}
