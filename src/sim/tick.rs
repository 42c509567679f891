//! Fixed timestep simulation tick
//!
//! Advances the road, the player and the traffic by exactly one tick.

use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{GameEvent, Obstacle, WorldState};
use crate::consts::*;

/// Lateral input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// Source of spawn positions, the only nondeterminism in a tick
pub trait SpawnSource {
    /// Pick an x in `0..=max_x`
    fn spawn_x(&mut self, max_x: i32) -> i32;
}

impl SpawnSource for Pcg32 {
    fn spawn_x(&mut self, max_x: i32) -> i32 {
        self.random_range(0..=max_x)
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub collided: bool,
    pub events: Vec<GameEvent>,
}

/// Advance the world by one fixed timestep
pub fn tick(
    state: &mut WorldState,
    input: &TickInput,
    dt: f32,
    spawner: &mut impl SpawnSource,
) -> TickOutcome {
    let mut events = Vec::new();

    state.ticks += 1;
    state.elapsed_secs += dt;

    // Two stacked road tiles loop independently
    for offset in &mut state.road_offsets {
        *offset += state.road_speed;
        if *offset >= PLAY_HEIGHT {
            *offset = -PLAY_HEIGHT;
        }
    }

    // Left wins when both are held
    let max_x = state.player_max_x();
    if input.left {
        state.player_pos.x = (state.player_pos.x - state.player_speed).clamp(0, max_x);
    } else if input.right {
        state.player_pos.x = (state.player_pos.x + state.player_speed).clamp(0, max_x);
    }

    state.spawn_counter += 1;
    if state.spawn_counter > SPAWN_THRESHOLD {
        let x = spawner.spawn_x(PLAY_WIDTH - OBSTACLE_WIDTH);
        state.obstacles.push(Obstacle::spawn_at(x));
        state.spawn_counter = 0;
        log::debug!("Spawned car at x={} ({} on road)", x, state.obstacles.len());
        events.push(GameEvent::ObstacleSpawned { x });
    }

    for obstacle in &mut state.obstacles {
        obstacle.pos.y += state.obstacle_speed;
    }
    state.obstacles.retain(|o| o.pos.y < PLAY_HEIGHT);

    let player_hitbox = state.player_rect().hitbox();
    let collided = state
        .obstacles
        .iter()
        .any(|o| o.rect().hitbox().intersects(&player_hitbox));

    if collided {
        state.collided = true;
        events.push(GameEvent::Collision);
    } else {
        state.score_counter += 1;
        if state.score_counter >= SCORE_INTERVAL {
            state.score += 1;
            state.score_counter = 0;
            events.push(GameEvent::ScoreChanged(state.score));

            // Only reachable on the tick the score changes, so each
            // multiple of 50 ramps exactly once
            if state.score % SPEED_UP_EVERY == 0 {
                state.road_speed += 1;
                state.obstacle_speed += 1;
                log::debug!(
                    "Speed up at score {}: road={} cars={}",
                    state.score,
                    state.road_speed,
                    state.obstacle_speed
                );
                events.push(GameEvent::SpeedUp {
                    road_speed: state.road_speed,
                    obstacle_speed: state.obstacle_speed,
                });
            }
        }
    }

    TickOutcome { collided, events }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use proptest::prelude::*;
    use rand::SeedableRng;

    /// Replays a fixed list of spawn positions
    struct ScriptedSpawns {
        xs: Vec<i32>,
        calls: usize,
    }

    impl ScriptedSpawns {
        fn new(xs: &[i32]) -> Self {
            Self {
                xs: xs.to_vec(),
                calls: 0,
            }
        }
    }

    impl SpawnSource for ScriptedSpawns {
        fn spawn_x(&mut self, max_x: i32) -> i32 {
            let x = self.xs[self.calls % self.xs.len()].min(max_x);
            self.calls += 1;
            x
        }
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_spawn_on_forty_first_tick() {
        let mut state = WorldState::new();
        let mut spawns = ScriptedSpawns::new(&[0]);

        for _ in 0..40 {
            tick(&mut state, &idle(), SIM_DT, &mut spawns);
        }
        assert!(state.obstacles.is_empty());
        assert_eq!(state.spawn_counter, 40);

        let outcome = tick(&mut state, &idle(), SIM_DT, &mut spawns);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.spawn_counter, 0);
        assert_eq!(spawns.calls, 1);
        assert!(outcome.events.contains(&GameEvent::ObstacleSpawned { x: 0 }));
        // Spawned then moved within the same tick
        assert_eq!(
            state.obstacles[0].pos,
            IVec2::new(0, -OBSTACLE_HEIGHT + BASE_OBSTACLE_SPEED)
        );
    }

    #[test]
    fn test_obstacles_advance_and_leave_the_road() {
        let mut state = WorldState::new();
        state.obstacles.push(Obstacle {
            pos: IVec2::new(0, 100),
        });
        state.obstacles.push(Obstacle {
            pos: IVec2::new(300, PLAY_HEIGHT - 2),
        });
        let mut spawns = ScriptedSpawns::new(&[0]);

        tick(&mut state, &idle(), SIM_DT, &mut spawns);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].pos.y, 100 + BASE_OBSTACLE_SPEED);
    }

    #[test]
    fn test_road_tiles_wrap() {
        let mut state = WorldState::new();
        state.road_offsets = [PLAY_HEIGHT - 4, -4];
        let mut spawns = ScriptedSpawns::new(&[0]);

        tick(&mut state, &idle(), SIM_DT, &mut spawns);
        assert_eq!(state.road_offsets, [-PLAY_HEIGHT, 0]);
    }

    #[test]
    fn test_left_has_priority_and_clamps() {
        let mut state = WorldState::new();
        let mut spawns = ScriptedSpawns::new(&[0]);
        let both = TickInput {
            left: true,
            right: true,
        };

        tick(&mut state, &both, SIM_DT, &mut spawns);
        assert_eq!(state.player_pos.x, PLAYER_START_X - PLAYER_SPEED);

        state.player_pos.x = 2;
        tick(&mut state, &both, SIM_DT, &mut spawns);
        assert_eq!(state.player_pos.x, 0);

        state.player_pos.x = PLAY_WIDTH - PLAYER_WIDTH - 1;
        let right = TickInput {
            left: false,
            right: true,
        };
        tick(&mut state, &right, SIM_DT, &mut spawns);
        assert_eq!(state.player_pos.x, PLAY_WIDTH - PLAYER_WIDTH);
    }

    #[test]
    fn test_score_every_eight_ticks() {
        let mut state = WorldState::new();
        let mut spawns = ScriptedSpawns::new(&[0]);

        for _ in 0..7 {
            tick(&mut state, &idle(), SIM_DT, &mut spawns);
        }
        assert_eq!(state.score, 0);
        let outcome = tick(&mut state, &idle(), SIM_DT, &mut spawns);
        assert_eq!(state.score, 1);
        assert_eq!(state.score_counter, 0);
        assert!(outcome.events.contains(&GameEvent::ScoreChanged(1)));
    }

    #[test]
    fn test_speed_up_once_per_threshold() {
        let mut state = WorldState::new();
        state.score = 49;
        state.score_counter = SCORE_INTERVAL - 1;
        // Keep the road clear so nothing collides
        let mut spawns = ScriptedSpawns::new(&[0]);
        state.player_pos.x = PLAY_WIDTH - PLAYER_WIDTH;

        let outcome = tick(&mut state, &idle(), SIM_DT, &mut spawns);
        assert_eq!(state.score, 50);
        assert_eq!(state.road_speed, BASE_ROAD_SPEED + 1);
        assert_eq!(state.obstacle_speed, BASE_OBSTACLE_SPEED + 1);
        assert!(outcome.events.iter().any(|e| matches!(e, GameEvent::SpeedUp { .. })));

        // Score sits at 50 for the next seven ticks; no further ramp
        for _ in 0..7 {
            state.obstacles.clear();
            tick(&mut state, &idle(), SIM_DT, &mut spawns);
        }
        assert_eq!(state.score, 50);
        assert_eq!(state.road_speed, BASE_ROAD_SPEED + 1);
        assert_eq!(state.obstacle_speed, BASE_OBSTACLE_SPEED + 1);
    }

    #[test]
    fn test_collision_freezes_score() {
        let mut state = WorldState::new();
        let player = state.player_pos;
        state.obstacles.push(Obstacle {
            pos: IVec2::new(player.x, player.y - 20),
        });
        state.score_counter = SCORE_INTERVAL - 1;
        let mut spawns = ScriptedSpawns::new(&[0]);

        let outcome = tick(&mut state, &idle(), SIM_DT, &mut spawns);
        assert!(outcome.collided);
        assert!(state.collided);
        assert_eq!(outcome.events, vec![GameEvent::Collision]);
        assert_eq!(state.score, 0);
        assert_eq!(state.score_counter, SCORE_INTERVAL - 1);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let mut a = WorldState::new();
        let mut b = WorldState::new();
        let mut rng_a = Pcg32::seed_from_u64(99999);
        let mut rng_b = Pcg32::seed_from_u64(99999);

        for i in 0..300 {
            let input = TickInput {
                left: i % 3 == 0,
                right: i % 5 == 0,
            };
            tick(&mut a, &input, SIM_DT, &mut rng_a);
            tick(&mut b, &input, SIM_DT, &mut rng_b);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_pcg_spawns_stay_on_road() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let x = rng.spawn_x(PLAY_WIDTH - OBSTACLE_WIDTH);
            assert!((0..=PLAY_WIDTH - OBSTACLE_WIDTH).contains(&x));
        }
    }

    proptest! {
        #[test]
        fn prop_player_stays_on_road(
            inputs in prop::collection::vec((any::<bool>(), any::<bool>()), 0..400),
        ) {
            let mut state = WorldState::new();
            let mut spawns = ScriptedSpawns::new(&[0, 150, 383]);
            for (left, right) in inputs {
                state.obstacles.clear();
                tick(&mut state, &TickInput { left, right }, SIM_DT, &mut spawns);
                prop_assert!(state.player_pos.x >= 0);
                prop_assert!(state.player_pos.x <= PLAY_WIDTH - PLAYER_WIDTH);
            }
        }

        #[test]
        fn prop_obstacles_move_by_speed(
            ys in prop::collection::vec(-200i32..700, 1..10),
            speed in 1i32..12,
        ) {
            let mut state = WorldState::new();
            state.player_pos.x = 0;
            state.obstacle_speed = speed;
            state.obstacles = ys.iter().map(|&y| Obstacle { pos: IVec2::new(383, y) }).collect();
            let mut spawns = ScriptedSpawns::new(&[383]);

            tick(&mut state, &TickInput::default(), SIM_DT, &mut spawns);

            let expected: Vec<i32> = ys
                .iter()
                .map(|y| y + speed)
                .filter(|y| *y < PLAY_HEIGHT)
                .collect();
            let actual: Vec<i32> = state.obstacles.iter().map(|o| o.pos.y).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
