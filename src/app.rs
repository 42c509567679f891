//! Top-level screen dispatcher
//!
//! Exactly one screen is active at a time. Each frame feeds that screen the
//! frame's input events and, for the road, one simulation tick. Screen
//! changes are plain assignments to `Game::screen`.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, SoundEffect};
use crate::consts::{MODAL_RATE, SIM_DT, TICK_RATE};
use crate::highscores::{HighScoreEntry, HighScoreStore, HighScores};
use crate::platform::input::{InputEvent, KeyState};
use crate::render::{DrawCommand, scene};
use crate::settings::Settings;
use crate::sim::{WorldState, tick};
use crate::ui::{GameOverScreen, GameOverStatus, NameCapture};

/// Which loop currently owns input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Road is scrolling
    Playing,
    /// Asking for a name after a qualifying run
    NameEntry(NameCapture),
    /// Summary with restart prompt
    GameOver(GameOverScreen),
}

/// What the outer loop should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// Game session: world, leaderboard and the active screen
pub struct Game<A: AudioSink> {
    world: WorldState,
    scores: HighScores,
    store: HighScoreStore,
    rng: Pcg32,
    audio: A,
    settings: Settings,
    screen: Screen,
    keys: KeyState,
    new_high_score: bool,
}

impl<A: AudioSink> Game<A> {
    /// Load the leaderboard and start the first run
    pub fn new(settings: Settings, store: HighScoreStore, mut audio: A) -> Self {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Starting run with seed: {}", seed);

        let scores = store.load();
        audio.start_music();

        Self {
            world: WorldState::new(),
            scores,
            store,
            rng: Pcg32::seed_from_u64(seed),
            audio,
            settings,
            screen: Screen::Playing,
            keys: KeyState::default(),
            new_high_score: false,
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Frames per second the active screen runs at
    pub fn tick_rate(&self) -> u32 {
        match self.screen {
            Screen::Playing => TICK_RATE,
            Screen::NameEntry(_) | Screen::GameOver(_) => MODAL_RATE,
        }
    }

    /// Run one frame of the active screen
    pub fn frame(&mut self, events: &[InputEvent]) -> Control {
        match self.screen {
            Screen::Playing => self.frame_playing(events),
            Screen::NameEntry(_) => self.frame_name_entry(events),
            Screen::GameOver(_) => self.frame_game_over(events),
        }
    }

    /// Describe the active screen
    pub fn draw(&self) -> Vec<DrawCommand> {
        match &self.screen {
            Screen::Playing => scene::playing(&self.world),
            Screen::NameEntry(capture) => scene::name_entry(&self.world, capture),
            Screen::GameOver(screen) => scene::game_over(&self.world, screen, &self.scores),
        }
    }

    fn frame_playing(&mut self, events: &[InputEvent]) -> Control {
        for event in events {
            if *event == InputEvent::Quit {
                return Control::Exit;
            }
            self.keys.apply(event);
        }

        let outcome = tick(&mut self.world, &self.keys.tick_input(), SIM_DT, &mut self.rng);
        if outcome.collided {
            self.enter_game_over();
        }
        Control::Continue
    }

    fn enter_game_over(&mut self) {
        let score = self.world.score;
        log::info!("Game Over! score={} time={:.1}s", score, self.world.elapsed_secs);

        self.audio.stop_music();
        self.audio.play(SoundEffect::Crash);
        self.keys.clear();

        let previous_high = self.scores.top_score().unwrap_or(0);
        self.new_high_score = score > previous_high;

        if self.scores.qualifies(score) {
            self.screen = Screen::NameEntry(NameCapture::new());
        } else {
            let rank = self.scores.rank_of(score);
            self.show_summary(rank);
        }
    }

    fn frame_name_entry(&mut self, events: &[InputEvent]) -> Control {
        let Screen::NameEntry(capture) = &mut self.screen else {
            return Control::Continue;
        };
        capture.advance_frame();

        let mut finished = None;
        for event in events {
            if let Some(name) = capture.handle(event).name() {
                finished = Some((name.to_string(), *event == InputEvent::Quit));
                break;
            }
        }

        match finished {
            Some((name, quit)) => {
                self.record_score(name);
                if quit {
                    Control::Exit
                } else {
                    Control::Continue
                }
            }
            None => Control::Continue,
        }
    }

    fn record_score(&mut self, name: String) {
        let score = self.world.score;
        let rank = self.scores.add(HighScoreEntry::new(name, score));
        self.store.save(&self.scores);
        self.show_summary(rank);
    }

    fn show_summary(&mut self, highlight_rank: Option<usize>) {
        let screen = GameOverScreen::new(self.world.score, self.new_high_score, highlight_rank)
            .with_steady(self.settings.reduced_motion);
        self.screen = Screen::GameOver(screen);
    }

    fn frame_game_over(&mut self, events: &[InputEvent]) -> Control {
        let Screen::GameOver(screen) = &mut self.screen else {
            return Control::Continue;
        };
        screen.advance_frame();

        let mut status = GameOverStatus::Displaying;
        for event in events {
            status = screen.handle(event);
            if status != GameOverStatus::Displaying {
                break;
            }
        }

        match status {
            GameOverStatus::Displaying => Control::Continue,
            GameOverStatus::Restarting => {
                self.restart();
                Control::Continue
            }
            GameOverStatus::Exiting => Control::Exit,
        }
    }

    /// Fresh world, music back on, road screen active
    pub fn restart(&mut self) {
        self.world.reset();
        self.keys.clear();
        self.new_high_score = false;
        self.audio.start_music();
        self.screen = Screen::Playing;
        log::info!("Restarted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCue, RecordingAudio};
    use crate::consts::*;
    use crate::persistence::test_support::temp_dir;
    use crate::platform::input::Key;
    use crate::sim::Obstacle;
    use glam::IVec2;

    fn new_game(tag: &str, stored: Option<&str>) -> (Game<RecordingAudio>, HighScoreStore) {
        let dir = temp_dir(tag);
        let store = HighScoreStore::new(dir.join(crate::highscores::LEADERBOARD_FILE));
        if let Some(json) = stored {
            std::fs::write(store.path(), json).unwrap();
        }
        let settings = Settings {
            seed: Some(1234),
            ..Default::default()
        };
        (Game::new(settings, store.clone(), RecordingAudio::default()), store)
    }

    /// Put a car right on top of the player so the next tick collides
    fn crash(game: &mut Game<RecordingAudio>, score: u64) {
        game.world.score = score;
        let player = game.world.player_pos;
        game.world.obstacles.push(Obstacle {
            pos: IVec2::new(player.x, player.y - 20),
        });
        assert_eq!(game.frame(&[]), Control::Continue);
    }

    #[test]
    fn test_quit_while_playing_exits() {
        let (mut game, _) = new_game("app_quit", None);
        assert_eq!(game.frame(&[InputEvent::Quit]), Control::Exit);
    }

    #[test]
    fn test_held_keys_move_player() {
        let (mut game, _) = new_game("app_keys", None);
        game.frame(&[InputEvent::Press(Key::Right)]);
        game.frame(&[]);
        assert_eq!(game.world().player_pos.x, PLAYER_START_X + 2 * PLAYER_SPEED);
        game.frame(&[InputEvent::Release(Key::Right)]);
        assert_eq!(game.world().player_pos.x, PLAYER_START_X + 2 * PLAYER_SPEED);
    }

    #[test]
    fn test_qualifying_crash_asks_for_name_then_saves() {
        let (mut game, store) = new_game("app_name", Some(r#"{"scores":[30,20,10]}"#));
        crash(&mut game, 25);

        assert!(matches!(game.screen(), Screen::NameEntry(_)));
        assert_eq!(game.tick_rate(), MODAL_RATE);
        assert_eq!(
            game.audio().cues,
            vec![
                AudioCue::MusicStarted,
                AudioCue::MusicStopped,
                AudioCue::Effect(SoundEffect::Crash)
            ]
        );

        let typed: Vec<InputEvent> = "Kim".chars().map(InputEvent::Char).collect();
        game.frame(&typed);
        game.frame(&[InputEvent::Press(Key::Enter)]);

        let Screen::GameOver(screen) = game.screen() else {
            panic!("expected summary screen");
        };
        assert_eq!(screen.highlight_rank, Some(2));
        assert!(!screen.new_high_score);

        let saved = store.load();
        assert_eq!(
            saved.entries,
            vec![
                HighScoreEntry::new("Player", 30),
                HighScoreEntry::new("Kim", 25),
                HighScoreEntry::new("Player", 20),
            ]
        );
    }

    #[test]
    fn test_tie_with_lowest_skips_name_entry() {
        let (mut game, store) = new_game("app_tie", Some(r#"{"scores":[30,20,10]}"#));
        crash(&mut game, 10);

        let Screen::GameOver(screen) = game.screen() else {
            panic!("expected summary screen");
        };
        assert_eq!(screen.highlight_rank, Some(3));
        assert_eq!(store.load(), *game.scores());
    }

    #[test]
    fn test_new_high_score_flag() {
        let (mut game, _) = new_game("app_high", Some(r#"{"scores":[30]}"#));
        crash(&mut game, 31);
        game.frame(&[InputEvent::Press(Key::Escape)]);

        let Screen::GameOver(screen) = game.screen() else {
            panic!("expected summary screen");
        };
        assert!(screen.new_high_score);
        assert_eq!(screen.highlight_rank, Some(1));
        assert_eq!(game.scores().entries[0], HighScoreEntry::new("Player", 31));
    }

    #[test]
    fn test_quit_during_name_entry_saves_default_and_exits() {
        let (mut game, store) = new_game("app_name_quit", None);
        crash(&mut game, 5);
        assert_eq!(game.frame(&[InputEvent::Quit]), Control::Exit);
        assert_eq!(store.load().entries, vec![HighScoreEntry::new("Player", 5)]);
    }

    #[test]
    fn test_restart_resets_world() {
        let (mut game, _) = new_game("app_restart", Some(r#"{"scores":[90,80,70]}"#));
        game.world.road_speed = 9;
        game.world.obstacle_speed = 8;
        game.world.player_pos.x = 0;
        crash(&mut game, 3);
        assert!(matches!(game.screen(), Screen::GameOver(_)));

        assert_eq!(game.frame(&[InputEvent::Char('r')]), Control::Continue);
        assert_eq!(*game.screen(), Screen::Playing);
        assert_eq!(game.tick_rate(), TICK_RATE);

        let world = game.world();
        assert_eq!(world.score, 0);
        assert!(world.obstacles.is_empty());
        assert_eq!(world.road_speed, BASE_ROAD_SPEED);
        assert_eq!(world.obstacle_speed, BASE_OBSTACLE_SPEED);
        assert_eq!(world.player_pos.x, PLAYER_START_X);
        assert_eq!(world.road_offsets, [0, -PLAY_HEIGHT]);
        assert_eq!(world.spawn_counter, 0);
        assert_eq!(world.score_counter, 0);
        assert_eq!(game.audio().cues.last(), Some(&AudioCue::MusicStarted));
    }

    #[test]
    fn test_escape_on_summary_exits() {
        let (mut game, _) = new_game("app_exit", Some(r#"{"scores":[90,80,70]}"#));
        crash(&mut game, 1);
        assert_eq!(game.frame(&[]), Control::Continue);
        assert_eq!(game.frame(&[InputEvent::Press(Key::Escape)]), Control::Exit);
    }

    #[test]
    fn test_unwritable_store_does_not_block_restart() {
        let dir = temp_dir("app_unwritable");
        let path = dir.join(crate::highscores::LEADERBOARD_FILE);
        std::fs::create_dir_all(path.join("blocker")).unwrap();
        let mut game = Game::new(
            Settings::default(),
            HighScoreStore::new(&path),
            RecordingAudio::default(),
        );

        crash(&mut game, 4);
        game.frame(&[InputEvent::Press(Key::Escape)]);
        assert!(matches!(game.screen(), Screen::GameOver(_)));
        game.frame(&[InputEvent::Char('R')]);
        assert_eq!(*game.screen(), Screen::Playing);
    }
}
