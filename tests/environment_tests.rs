//! Control environment validation tests

use rand::rngs::StdRng;
use rand::Rng;

use intersection_sim::simulation::{
    Arrival, ArrivalProcess, ConfigError, Direction, EnvError, GreenSplit, Insertion, IntersectionConfig,
    NoArrivals, Observation, Position, ScheduledArrivals, TrafficSignalEnv, VehicleClass, VehicleId,
};

fn quiet_env(config: IntersectionConfig) -> TrafficSignalEnv {
    TrafficSignalEnv::with_arrivals(config, Box::new(NoArrivals)).expect("valid config")
}

#[test]
fn test_every_action_splits_the_full_cycle() {
    let mut env = quiet_env(IntersectionConfig::default());
    assert_eq!(env.action_count(), 29);

    for action in 0..env.action_count() {
        env.reset();
        let step = env.step(action).expect("valid action");
        let green = step.info.green;
        assert_eq!(green.ns, action as u32 + 1);
        assert_eq!(green.ns + green.ew, 30);
        assert!(green.ew >= 1);
    }
}

#[test]
fn test_empty_intersection_step() {
    let mut env = quiet_env(IntersectionConfig::default());
    assert_eq!(env.reset(), Observation { ns: 0, ew: 0 });

    let step = env.step(14).unwrap();

    assert_eq!(step.info.green, GreenSplit { ns: 15, ew: 15 });
    assert_eq!(step.observation, Observation { ns: 0, ew: 0 });
    assert_eq!(step.reward, 0.0);
    assert!(step.terminated);
    assert!(step.truncated);
    assert_eq!(env.elapsed(), 30);
    assert_eq!(step.info.elapsed, 30);
}

#[test]
fn test_invalid_action_leaves_episode_untouched() {
    let mut env = quiet_env(IntersectionConfig::default());
    env.insert_vehicle(Direction::Up, 0, VehicleClass::Bike).unwrap();

    for action in [29, 30, usize::MAX] {
        assert_eq!(
            env.step(action),
            Err(EnvError::InvalidAction {
                action,
                actions: 29
            })
        );
    }

    assert_eq!(env.elapsed(), 0);
    let bike = env.vehicles().next().expect("bike still queued");
    assert_eq!(bike.position, Position::new(602.0, 800.0));
}

#[test]
fn test_finished_episode_rejects_steps_until_reset() {
    let mut env = quiet_env(IntersectionConfig::default());
    env.step(3).unwrap();

    assert_eq!(env.step(3), Err(EnvError::EpisodeFinished { elapsed: 30 }));

    env.reset();
    assert_eq!(env.elapsed(), 0);
    assert!(env.step(3).is_ok());
}

#[test]
fn test_multi_cycle_episode_terminates_on_last_cycle() {
    let config = IntersectionConfig {
        episode_cycles: 3,
        ..IntersectionConfig::default()
    };
    let mut env = quiet_env(config);

    let flags: Vec<bool> = (0..3).map(|_| env.step(10).unwrap().terminated).collect();
    assert_eq!(flags, vec![false, false, true]);
    assert_eq!(env.elapsed(), 90);
}

#[test]
fn test_reset_clears_vehicles() {
    let config = IntersectionConfig {
        arrival_rate: 0.5,
        seed: Some(11),
        ..IntersectionConfig::default()
    };
    let mut env = TrafficSignalEnv::new(config).unwrap();

    let step = env.step(20).unwrap();
    assert!(step.info.inserted > 0);
    assert_eq!(
        step.observation.ns + step.observation.ew,
        step.info.lane_counts.iter().flatten().sum::<usize>()
    );

    assert_eq!(env.reset(), Observation::default());
    assert_eq!(env.observation(), Observation::default());
    assert_eq!(env.vehicles().count(), 0);
}

#[test]
fn test_reward_is_negated_interval_waiting() {
    let mut config = IntersectionConfig {
        yellow: 5,
        ..IntersectionConfig::default()
    };
    config.approach_mut(Direction::Down).spawn[0] = Position::new(755.0, 290.0);
    let mut env = quiet_env(config);

    env.insert_vehicle(Direction::Down, 0, VehicleClass::Car).unwrap();
    env.insert_vehicle(Direction::Down, 0, VehicleClass::Car).unwrap();

    // a one-unit NS window is entirely yellow, so both queued cars wait once
    let step = env.step(0).unwrap();

    assert_eq!(step.info.waiting_time, 2);
    assert_eq!(step.info.queued_waiting_time, 2);
    assert_eq!(step.reward, -2.0);
    assert_eq!(step.observation.ns, 2);
}

#[test]
fn test_every_assigned_unit_is_green_by_default() {
    let mut config = IntersectionConfig::default();
    // both cars start queued with their front edge on the stop line
    config.approach_mut(Direction::Down).spawn[0] = Position::new(755.0, 290.0);
    config.approach_mut(Direction::Right).spawn[0] = Position::new(550.0, 348.0);
    let mut env = quiet_env(config);

    for action in [0, 4, 28] {
        env.reset();
        env.insert_vehicle(Direction::Down, 0, VehicleClass::Car).unwrap();
        env.insert_vehicle(Direction::Right, 0, VehicleClass::Car).unwrap();

        let step = env.step(action).unwrap();
        let green = step.info.green;
        assert_eq!(step.reward, 0.0, "action {}", action);

        let right = env
            .vehicles()
            .find(|car| car.direction == Direction::Right)
            .unwrap();
        assert_eq!(
            right.position,
            Position::new(550.0 + 2.25 * green.ew as f32, 348.0)
        );
        let down = env
            .vehicles()
            .find(|car| car.direction == Direction::Down)
            .unwrap();
        assert_eq!(
            down.position,
            Position::new(755.0, 290.0 + 2.25 * green.ns as f32)
        );
    }
}

#[test]
fn test_scheduled_arrivals_enter_their_lanes() {
    let arrival = |direction, lane| Arrival {
        direction,
        lane,
        class: VehicleClass::Car,
    };
    let schedule = ScheduledArrivals::new(vec![
        (0, arrival(Direction::Right, 0)),
        (0, arrival(Direction::Down, 2)),
        (12, arrival(Direction::Up, 1)),
        (29, arrival(Direction::Left, 1)),
    ]);
    let mut env =
        TrafficSignalEnv::with_arrivals(IntersectionConfig::default(), Box::new(schedule))
            .unwrap();

    let step = env.step(14).unwrap();

    assert_eq!(step.info.inserted, 4);
    assert_eq!(step.observation, Observation { ns: 2, ew: 2 });
    assert_eq!(step.info.lane_counts[Direction::Down.index()], vec![0, 0, 1]);
}

#[test]
fn test_full_lane_drops_are_counted() {
    let config = IntersectionConfig {
        max_vehicles_per_lane: 1,
        ..IntersectionConfig::default()
    };
    let arrivals = (0..3)
        .map(|unit| {
            (
                unit,
                Arrival {
                    direction: Direction::Left,
                    lane: 0,
                    class: VehicleClass::Truck,
                },
            )
        })
        .collect();
    let mut env =
        TrafficSignalEnv::with_arrivals(config, Box::new(ScheduledArrivals::new(arrivals)))
            .unwrap();

    let step = env.step(14).unwrap();

    assert_eq!(step.info.inserted, 1);
    assert_eq!(step.info.dropped, 2);
    assert_eq!(env.simulator().dropped, 2);
    assert_eq!(step.observation.as_array(), [0, 1]);
}

#[test]
fn test_bad_arrival_aborts_step_without_changes() {
    let schedule = ScheduledArrivals::new(vec![
        (
            0,
            Arrival {
                direction: Direction::Right,
                lane: 0,
                class: VehicleClass::Car,
            },
        ),
        (
            5,
            Arrival {
                direction: Direction::Left,
                lane: 7,
                class: VehicleClass::Car,
            },
        ),
    ]);
    let mut env =
        TrafficSignalEnv::with_arrivals(IntersectionConfig::default(), Box::new(schedule))
            .unwrap();

    assert!(matches!(
        env.step(14),
        Err(EnvError::UnknownLane { lane: 7, .. })
    ));
    assert_eq!(env.elapsed(), 0);
    assert_eq!(env.vehicles().count(), 0);
    assert_eq!(
        env.insert_vehicle(Direction::Right, 0, VehicleClass::Bus),
        Ok(Insertion::Inserted(VehicleId(0)))
    );
}

/// One car per unit on a random `right` lane, plus one bad arrival at `bad_unit`
struct RandomRightLanes {
    bad_unit: Option<u32>,
}

impl ArrivalProcess for RandomRightLanes {
    fn arrivals(&mut self, unit: u32, rng: &mut StdRng, out: &mut Vec<Arrival>) {
        out.push(Arrival {
            direction: Direction::Right,
            lane: rng.random_range(0..3),
            class: VehicleClass::Car,
        });
        if self.bad_unit == Some(unit) {
            self.bad_unit = None;
            out.push(Arrival {
                direction: Direction::Right,
                lane: 9,
                class: VehicleClass::Car,
            });
        }
    }
}

#[test]
fn test_failed_step_does_not_advance_the_rng() {
    let config = IntersectionConfig {
        seed: Some(21),
        ..IntersectionConfig::default()
    };
    let mut failing = TrafficSignalEnv::with_arrivals(
        config.clone(),
        Box::new(RandomRightLanes { bad_unit: Some(5) }),
    )
    .unwrap();
    let mut clean =
        TrafficSignalEnv::with_arrivals(config, Box::new(RandomRightLanes { bad_unit: None }))
            .unwrap();

    assert!(matches!(
        failing.step(14),
        Err(EnvError::UnknownLane { lane: 9, .. })
    ));

    let replayed = failing.step(14).unwrap();
    assert_eq!(replayed, clean.step(14).unwrap());
    assert_eq!(replayed.info.inserted, 30);
}

#[test]
fn test_seeded_environments_replay_identically() {
    let config = IntersectionConfig {
        arrival_rate: 0.3,
        episode_cycles: 4,
        seed: Some(7),
        ..IntersectionConfig::default()
    };
    let mut first = TrafficSignalEnv::new(config.clone()).unwrap();
    let mut second = TrafficSignalEnv::new(config).unwrap();

    for action in [3, 20, 14, 0] {
        assert_eq!(first.step(action).unwrap(), second.step(action).unwrap());
    }

    first.reset_with_seed(99);
    second.reset_with_seed(99);
    assert_eq!(first.step(5).unwrap(), second.step(5).unwrap());
}

#[test]
fn test_invalid_config_is_fatal() {
    let mut config = IntersectionConfig::default();
    config.approach_mut(Direction::Right).spawn.push(Position::new(0.0, 420.0));
    assert!(matches!(
        TrafficSignalEnv::new(config).err(),
        Some(ConfigError::SpawnTable {
            direction: Direction::Right,
            expected: 3,
            found: 4,
        })
    ));

    let config = IntersectionConfig {
        arrival_rate: 1.5,
        ..IntersectionConfig::default()
    };
    assert!(matches!(
        TrafficSignalEnv::new(config).err(),
        Some(ConfigError::ArrivalRate(_))
    ));
}
