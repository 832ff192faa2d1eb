//! Vehicle movement tests

use intersection_sim::simulation::{
    spawn_point, Direction, SignalColor, TurnIntent, Vehicle, VehicleId, VehicleState, CENTER_Y,
    ROAD_LENGTH, STOPPED_SPEED, VEHICLE_LENGTH,
};

const DT: f32 = 1.0 / 30.0;

fn vehicle(id: usize, origin: Direction, turn: TurnIntent) -> Vehicle {
    Vehicle::new(VehicleId(id), origin, turn, 25.0)
}

#[test]
fn test_new_vehicle_starts_at_rest() {
    let v = vehicle(0, Direction::North, TurnIntent::Straight);
    assert_eq!(v.position, spawn_point(Direction::North));
    assert_eq!(v.heading, Direction::North.heading());
    assert_eq!(v.speed, 0.0);
    assert_eq!(v.state, VehicleState::Approaching);
    assert!(v.distance_to_stop_line() > 0.0);
    assert_eq!(v.path_index(), 0);
}

#[test]
fn test_speed_stays_within_bounds() {
    for turn in [TurnIntent::Straight, TurnIntent::Left, TurnIntent::Right] {
        let mut v = vehicle(0, Direction::East, turn);
        for tick in 0..3000 {
            let signal = if (tick / 200) % 2 == 0 {
                SignalColor::Green
            } else {
                SignalColor::Red
            };
            v.update(DT, signal, None);
            assert!(v.speed >= 0.0 && v.speed <= v.target_speed, "speed {}", v.speed);
            if v.is_off_screen() {
                break;
            }
        }
    }
}

#[test]
fn test_north_straight_on_green_exits_with_heading_unchanged() {
    let mut v = vehicle(0, Direction::North, TurnIntent::Straight);
    let spawn_heading = v.heading;

    let mut ticks = 0;
    while v.position.y >= CENTER_Y - ROAD_LENGTH {
        v.update(DT, SignalColor::Green, None);
        assert_eq!(v.heading, spawn_heading);
        ticks += 1;
        assert!(ticks < 10_000, "vehicle never left the intersection");
    }

    assert_eq!(v.state, VehicleState::Exiting);
    assert_eq!(v.heading, spawn_heading);
}

#[test]
fn test_states_only_advance() {
    let mut v = vehicle(0, Direction::South, TurnIntent::Left);
    let mut previous = v.state;
    while !v.is_off_screen() {
        v.update(DT, SignalColor::Green, None);
        assert!(v.state >= previous);
        previous = v.state;
    }
    assert_eq!(previous, VehicleState::Exiting);
}

#[test]
fn test_follower_brakes_for_stationary_leader() {
    let mut leader = vehicle(0, Direction::North, TurnIntent::Straight);
    let mut follower = vehicle(1, Direction::North, TurnIntent::Straight);
    leader.advance(20.0);
    follower.speed = 10.0;

    let gap = follower
        .distance_to_leader([&leader])
        .expect("leader should be ahead");
    assert!((gap - 20.0).abs() < 1e-3);

    let before = follower.position;
    follower.update(DT, SignalColor::Green, Some(gap));
    assert!(follower.speed < 10.0);
    assert_eq!(follower.position, before);
}

#[test]
fn test_follower_never_passes_leader() {
    let mut leader = vehicle(0, Direction::West, TurnIntent::Straight);
    let mut follower = vehicle(1, Direction::West, TurnIntent::Straight);
    leader.advance(60.0);

    for _ in 0..600 {
        let gap = follower.distance_to_leader([&leader]);
        follower.update(DT, SignalColor::Green, gap);
        assert!(follower.position.x > leader.position.x);
    }
    let final_gap = follower.position.distance(&leader.position);
    assert!(final_gap >= VEHICLE_LENGTH - 1e-3);
}

#[test]
fn test_leader_ignores_other_directions_and_vehicles_behind() {
    let mut ahead = vehicle(0, Direction::North, TurnIntent::Straight);
    let behind = vehicle(1, Direction::North, TurnIntent::Straight);
    let other_lane = vehicle(2, Direction::South, TurnIntent::Straight);
    ahead.advance(50.0);

    assert!(ahead.distance_to_leader([&behind, &other_lane]).is_none());
    assert!(behind.distance_to_leader([&ahead, &other_lane]).is_some());
}

#[test]
fn test_stops_before_line_on_red() {
    let mut v = vehicle(0, Direction::South, TurnIntent::Straight);
    for _ in 0..2000 {
        v.update(DT, SignalColor::Red, None);
        assert!(v.distance_to_stop_line() > 0.0);
    }
    assert_eq!(v.state, VehicleState::Approaching);
    assert!(v.speed < STOPPED_SPEED);
    assert!(v.is_waiting());
    assert!(v.distance_to_stop_line() < 10.0);
    assert!(v.wait_time > 0.0);
}

#[test]
fn test_wait_time_resets_once_moving() {
    let mut v = vehicle(0, Direction::East, TurnIntent::Straight);
    for _ in 0..2000 {
        v.update(DT, SignalColor::Red, None);
    }
    let total = v.total_wait_time;
    assert!(total > 0.0);

    for _ in 0..120 {
        v.update(DT, SignalColor::Green, None);
    }
    assert_eq!(v.wait_time, 0.0);
    assert!(v.total_wait_time >= total);
}

#[test]
fn test_yellow_decision_distance() {
    let mut v = vehicle(0, Direction::North, TurnIntent::Straight);
    assert!(!v.signal_demands_stop(SignalColor::Yellow));
    assert!(v.signal_demands_stop(SignalColor::Red));

    // 370 units from the line at spawn
    v.advance(340.0);
    assert!(v.signal_demands_stop(SignalColor::Yellow));
    assert!(!v.signal_demands_stop(SignalColor::Green));
}

#[test]
fn test_committed_vehicles_ignore_signal() {
    let mut v = vehicle(0, Direction::West, TurnIntent::Straight);
    v.advance(400.0);
    assert!(v.distance_to_stop_line() < -10.0);
    assert!(!v.signal_demands_stop(SignalColor::Red));
}

#[test]
fn test_advance_carries_progress_between_calls() {
    let mut a = vehicle(0, Direction::North, TurnIntent::Straight);
    let mut b = vehicle(1, Direction::North, TurnIntent::Straight);

    for _ in 0..10 {
        a.advance(0.5);
    }
    b.advance(5.0);

    assert!(a.position.distance(&b.position) < 1e-3);
}

#[test]
fn test_exhausted_path_stops_vehicle() {
    let mut v = vehicle(0, Direction::East, TurnIntent::Right);
    v.advance(5000.0);
    assert!(v.is_path_exhausted());
    let end = v.path().last().expect("path is empty").position;
    assert_eq!(v.position, end);
    assert!(v.is_off_screen());
}
