//! Frame composition for each screen

use glam::IVec2;

use super::commands::{Anchor, DrawCommand, SpriteKind, colors};
use crate::consts::{MAX_HIGH_SCORES, PLAY_HEIGHT, PLAY_WIDTH};
use crate::highscores::HighScores;
use crate::sim::{Rect, WorldState};
use crate::ui::{GameOverScreen, NameCapture};

const HUD_FONT: u32 = 36;
const TITLE_FONT: u32 = 72;
const SUMMARY_FONT: u32 = 48;
const ROW_FONT: u32 = 32;
const HINT_FONT: u32 = 24;

const CENTER_X: i32 = PLAY_WIDTH / 2;
const CENTER_Y: i32 = PLAY_HEIGHT / 2;

/// Leaderboard row layout on the summary screen
const BOARD_TOP: i32 = CENTER_Y + 150;
const ROW_HEIGHT: i32 = 32;
const ROW_LEFT: i32 = 110;
const ROW_WIDTH: i32 = PLAY_WIDTH - 2 * ROW_LEFT;

/// Caret blink period in modal frames
const CARET_FRAMES: u32 = 15;

/// Road, traffic, player and score HUD
pub fn playing(world: &WorldState) -> Vec<DrawCommand> {
    let mut cmds = Vec::with_capacity(world.obstacles.len() + 5);
    cmds.push(DrawCommand::Clear(colors::BACKGROUND));

    for &offset in &world.road_offsets {
        cmds.push(DrawCommand::Sprite {
            kind: SpriteKind::Road,
            rect: Rect::new(0, offset, PLAY_WIDTH, PLAY_HEIGHT),
        });
    }

    cmds.push(DrawCommand::Sprite {
        kind: SpriteKind::Motorcycle,
        rect: world.player_rect(),
    });

    for obstacle in &world.obstacles {
        cmds.push(DrawCommand::Sprite {
            kind: SpriteKind::Car,
            rect: obstacle.rect(),
        });
    }

    cmds.push(DrawCommand::text(
        format!("Score: {}", world.score),
        IVec2::new(10, 10),
        HUD_FONT,
        colors::SCORE,
        Anchor::TopLeft,
    ));
    cmds
}

/// Frozen last frame with the summary, leaderboard and restart prompt
pub fn game_over(
    world: &WorldState,
    screen: &GameOverScreen,
    scores: &HighScores,
) -> Vec<DrawCommand> {
    let mut cmds = playing(world);
    cmds.push(overlay());

    if screen.new_high_score {
        cmds.push(DrawCommand::text(
            "NEW HIGH SCORE!",
            IVec2::new(CENTER_X, CENTER_Y - 70),
            HUD_FONT,
            colors::BANNER,
            Anchor::Center,
        ));
    }

    if screen.flash_visible() {
        cmds.push(DrawCommand::text(
            "GAME OVER",
            IVec2::new(CENTER_X, CENTER_Y),
            TITLE_FONT,
            colors::SCORE,
            Anchor::Center,
        ));
    }

    cmds.push(DrawCommand::text(
        format!("Score: {}", screen.final_score),
        IVec2::new(CENTER_X, CENTER_Y + 60),
        SUMMARY_FONT,
        colors::SCORE,
        Anchor::Center,
    ));
    cmds.push(DrawCommand::text(
        format!("Time: {:.1}s", world.elapsed_secs),
        IVec2::new(CENTER_X, CENTER_Y + 100),
        HINT_FONT,
        colors::HINT,
        Anchor::Center,
    ));

    leaderboard(&mut cmds, screen, scores);

    cmds.push(DrawCommand::text(
        "R: restart   ESC: quit",
        IVec2::new(CENTER_X, PLAY_HEIGHT - 20),
        HINT_FONT,
        colors::HINT,
        Anchor::Center,
    ));
    cmds
}

fn leaderboard(cmds: &mut Vec<DrawCommand>, screen: &GameOverScreen, scores: &HighScores) {
    cmds.push(DrawCommand::text(
        "TOP SCORES",
        IVec2::new(CENTER_X, BOARD_TOP - ROW_HEIGHT),
        ROW_FONT,
        colors::TEXT,
        Anchor::Center,
    ));

    if scores.is_empty() {
        cmds.push(DrawCommand::text(
            "No scores yet",
            IVec2::new(CENTER_X, BOARD_TOP),
            ROW_FONT,
            colors::HINT,
            Anchor::Center,
        ));
        return;
    }

    for (i, entry) in scores.entries.iter().take(MAX_HIGH_SCORES).enumerate() {
        let rank = i + 1;
        let row_y = BOARD_TOP + i as i32 * ROW_HEIGHT;
        let highlighted = screen.highlight_rank == Some(rank);

        if highlighted {
            cmds.push(DrawCommand::FillRect {
                rect: Rect::new(ROW_LEFT, row_y - ROW_HEIGHT / 2, ROW_WIDTH, ROW_HEIGHT),
                color: colors::HIGHLIGHT,
            });
            if screen.arrow_visible() {
                cmds.push(arrow(IVec2::new(ROW_LEFT - 10, row_y)));
            }
        }

        cmds.push(DrawCommand::text(
            format!("{}. {:<12} {:>6}", rank, entry.name, entry.score),
            IVec2::new(CENTER_X, row_y),
            ROW_FONT,
            colors::medal(rank),
            Anchor::Center,
        ));
    }
}

/// Right-pointing triangle whose tip is at `tip`
fn arrow(tip: IVec2) -> DrawCommand {
    DrawCommand::Polygon {
        points: vec![tip, tip + IVec2::new(-20, -10), tip + IVec2::new(-20, 10)],
        color: colors::ARROW,
    }
}

fn overlay() -> DrawCommand {
    DrawCommand::FillRect {
        rect: Rect::new(0, 0, PLAY_WIDTH, PLAY_HEIGHT),
        color: colors::OVERLAY,
    }
}

/// Name prompt over the frozen last frame
pub fn name_entry(world: &WorldState, capture: &NameCapture) -> Vec<DrawCommand> {
    let mut cmds = playing(world);
    cmds.push(overlay());

    cmds.push(DrawCommand::text(
        "NEW TOP SCORE!",
        IVec2::new(CENTER_X, CENTER_Y - 100),
        SUMMARY_FONT,
        colors::BANNER,
        Anchor::Center,
    ));
    cmds.push(DrawCommand::text(
        format!("Score: {}", world.score),
        IVec2::new(CENTER_X, CENTER_Y - 50),
        HUD_FONT,
        colors::SCORE,
        Anchor::Center,
    ));
    cmds.push(DrawCommand::text(
        "Enter your name:",
        IVec2::new(CENTER_X, CENTER_Y),
        ROW_FONT,
        colors::TEXT,
        Anchor::Center,
    ));

    cmds.push(DrawCommand::FillRect {
        rect: Rect::new(75, CENTER_Y + 25, PLAY_WIDTH - 150, 40),
        color: colors::INPUT_BOX,
    });
    let caret = if (capture.frames() / CARET_FRAMES) % 2 == 0 {
        "_"
    } else {
        " "
    };
    cmds.push(DrawCommand::text(
        format!("{}{}", capture.buffer(), caret),
        IVec2::new(CENTER_X, CENTER_Y + 45),
        ROW_FONT,
        colors::TEXT,
        Anchor::Center,
    ));

    cmds.push(DrawCommand::text(
        "ENTER: save   ESC: skip",
        IVec2::new(CENTER_X, CENTER_Y + 110),
        HINT_FONT,
        colors::HINT,
        Anchor::Center,
    ));
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScoreEntry;
    use crate::sim::Obstacle;

    fn texts(cmds: &[DrawCommand]) -> Vec<&str> {
        cmds.iter().filter_map(|c| c.as_text()).collect()
    }

    #[test]
    fn test_playing_draws_every_car_and_score() {
        let mut world = WorldState::new();
        world.score = 17;
        world.obstacles.push(Obstacle::spawn_at(10));
        world.obstacles.push(Obstacle::spawn_at(200));

        let cmds = playing(&world);
        let cars = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { kind: SpriteKind::Car, .. }))
            .count();
        let roads = cmds
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { kind: SpriteKind::Road, .. }))
            .count();
        assert_eq!(cars, 2);
        assert_eq!(roads, 2);
        assert!(texts(&cmds).contains(&"Score: 17"));
    }

    #[test]
    fn test_game_over_highlights_matching_row() {
        let world = WorldState::new();
        let scores = HighScores::from_entries(vec![
            HighScoreEntry::new("Ann", 90),
            HighScoreEntry::new("Bo", 42),
        ]);
        let screen = GameOverScreen::new(42, false, Some(2));

        let cmds = game_over(&world, &screen, &scores);
        let t = texts(&cmds);
        assert!(t.contains(&"GAME OVER"));
        assert!(t.contains(&"Score: 42"));
        assert!(!t.contains(&"NEW HIGH SCORE!"));
        assert!(cmds.iter().any(|c| matches!(c, DrawCommand::Polygon { .. })));

        let silver_row = cmds.iter().any(|c| match c {
            DrawCommand::Text { text, color, .. } => {
                text.starts_with("2. Bo") && *color == colors::SILVER
            }
            _ => false,
        });
        assert!(silver_row);
    }

    #[test]
    fn test_game_over_flash_hides_title() {
        let world = WorldState::new();
        let mut screen = GameOverScreen::new(3, true, None);
        for _ in 0..crate::consts::GAME_OVER_FLASH_FRAMES {
            screen.advance_frame();
        }
        let cmds = game_over(&world, &screen, &HighScores::new());
        let t = texts(&cmds);
        assert!(!t.contains(&"GAME OVER"));
        assert!(t.contains(&"NEW HIGH SCORE!"));
        assert!(t.contains(&"No scores yet"));
    }

    #[test]
    fn test_name_entry_shows_buffer() {
        let world = WorldState::new();
        let mut capture = NameCapture::new();
        capture.handle(&crate::platform::input::InputEvent::Char('Z'));
        let cmds = name_entry(&world, &capture);
        assert!(texts(&cmds).contains(&"Z_"));
    }
}
