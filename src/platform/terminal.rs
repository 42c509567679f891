//! Terminal frontend
//!
//! Rasterizes draw commands into a half-block pixel buffer (two pixels per
//! character cell) scaled to fit the terminal, and turns crossterm key events
//! into `InputEvent`s.

use std::collections::HashMap;
use std::io::{self, Stdout, Write, stdout};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::style::{self, Color as CColor};
use crossterm::{cursor, execute, queue, terminal};
use glam::{IVec2, Vec2};

use super::input::{InputEvent, Key};
use crate::audio::{AudioSink, SoundEffect};
use crate::consts::{PLAY_HEIGHT, PLAY_WIDTH};
use crate::render::{Anchor, Color, DrawCommand, SpriteKind};
use crate::sim::Rect;

/// Without key-release reporting, a first press counts as held this long.
///
/// Shorter than a typical auto-repeat delay (250-600 ms): a tap moves the
/// bike about 6 ticks (30 px), and a held key stutters once before the
/// terminal starts repeating it.
const TAP_TIMEOUT: Duration = Duration::from_millis(100);
/// Once repeats arrive, a key is released when they stop for this long
const REPEAT_TIMEOUT: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

impl Rgb {
    fn from_color(c: Color) -> Self {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgb(to_u8(c[0]), to_u8(c[1]), to_u8(c[2]))
    }

    fn blend(self, c: Color) -> Self {
        let a = c[3].clamp(0.0, 1.0);
        let src = Rgb::from_color(c);
        let mix = |d: u8, s: u8| (d as f32 * (1.0 - a) + s as f32 * a).round() as u8;
        Rgb(mix(self.0, src.0), mix(self.1, src.1), mix(self.2, src.2))
    }

    fn term(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const ASPHALT: Rgb = Rgb(60, 60, 64);
const VERGE: Rgb = Rgb(40, 110, 40);
const PAINT: Rgb = Rgb(230, 230, 230);
const BIKE: Rgb = Rgb(30, 90, 220);
const RIDER: Rgb = Rgb(250, 210, 60);
const TYRE: Rgb = Rgb(15, 15, 15);
const CAR_BODY: Rgb = Rgb(200, 30, 30);
const GLASS: Rgb = Rgb(120, 180, 230);

/// Text laid over the pixel grid
#[derive(Debug, Clone, Copy)]
struct Glyph {
    ch: char,
    fg: Rgb,
}

/// Half-block pixel buffer covering the terminal
struct Canvas {
    cols: usize,
    rows: usize,
    px: Vec<Rgb>,
    glyphs: HashMap<(usize, usize), Glyph>,
    /// Play-area pixels to canvas pixels
    scale: f32,
    origin: Vec2,
}

impl Canvas {
    fn new(cols: u16, rows: u16) -> Self {
        let cols = cols.max(1) as usize;
        let rows = rows.max(1) as usize;
        let (w, h) = (cols as f32, (rows * 2) as f32);
        let scale = (w / PLAY_WIDTH as f32).min(h / PLAY_HEIGHT as f32);
        let origin = Vec2::new(
            ((w - PLAY_WIDTH as f32 * scale) / 2.0).round(),
            ((h - PLAY_HEIGHT as f32 * scale) / 2.0).round(),
        );
        Self {
            cols,
            rows,
            px: vec![Rgb(0, 0, 0); cols * rows * 2],
            glyphs: HashMap::new(),
            scale,
            origin,
        }
    }

    fn width(&self) -> usize {
        self.cols
    }

    fn height(&self) -> usize {
        self.rows * 2
    }

    fn to_canvas(&self, p: IVec2) -> Vec2 {
        self.origin + p.as_vec2() * self.scale
    }

    fn to_play(&self, x: usize, y: usize) -> Vec2 {
        (Vec2::new(x as f32 + 0.5, y as f32 + 0.5) - self.origin) / self.scale
    }

    /// Canvas pixel range covered by a play-area rect, clipped to the play area
    fn pixel_span(&self, rect: &Rect) -> Option<(usize, usize, usize, usize)> {
        let play = Rect::new(0, 0, PLAY_WIDTH, PLAY_HEIGHT);
        let left = rect.left().max(play.left());
        let top = rect.top().max(play.top());
        let right = rect.right().min(play.right());
        let bottom = rect.bottom().min(play.bottom());
        if left >= right || top >= bottom {
            return None;
        }
        let a = self.to_canvas(IVec2::new(left, top));
        let b = self.to_canvas(IVec2::new(right, bottom));
        let x0 = (a.x.round().max(0.0) as usize).min(self.width());
        let y0 = (a.y.round().max(0.0) as usize).min(self.height());
        let x1 = (b.x.round().max(0.0) as usize).min(self.width());
        let y1 = (b.y.round().max(0.0) as usize).min(self.height());
        // Keep thin shapes visible
        let x1 = if x1 == x0 && x0 < self.width() {
            x0 + 1
        } else {
            x1
        };
        let y1 = if y1 == y0 && y0 < self.height() {
            y0 + 1
        } else {
            y1
        };
        Some((x0, y0, x1, y1))
    }

    fn blend_rect(&mut self, rect: &Rect, color: Color) {
        if let Some((x0, y0, x1, y1)) = self.pixel_span(rect) {
            for y in y0..y1 {
                for x in x0..x1 {
                    let i = y * self.cols + x;
                    self.px[i] = self.px[i].blend(color);
                }
            }
        }
    }

    fn fill_rect(&mut self, rect: &Rect, rgb: Rgb) {
        if let Some((x0, y0, x1, y1)) = self.pixel_span(rect) {
            for y in y0..y1 {
                self.px[y * self.cols + x0..y * self.cols + x1].fill(rgb);
            }
        }
    }

    /// Convex polygon fill by sampling pixel centers
    fn fill_polygon(&mut self, points: &[IVec2], color: Color) {
        if points.len() < 3 {
            return;
        }
        let min = points.iter().fold(IVec2::MAX, |m, p| m.min(*p));
        let max = points.iter().fold(IVec2::MIN, |m, p| m.max(*p));
        let Some((x0, y0, x1, y1)) = self.pixel_span(&Rect {
            pos: min,
            size: max - min,
        }) else {
            return;
        };
        let verts: Vec<Vec2> = points.iter().map(|p| p.as_vec2()).collect();
        for y in y0..y1 {
            for x in x0..x1 {
                let p = self.to_play(x, y);
                if convex_contains(&verts, p) {
                    let i = y * self.cols + x;
                    self.px[i] = self.px[i].blend(color);
                }
            }
        }
    }

    fn text(&mut self, text: &str, pos: IVec2, color: Color, anchor: Anchor) {
        let p = self.to_canvas(pos);
        let row = (p.y / 2.0).floor() as isize;
        let len = text.chars().count() as isize;
        let col = match anchor {
            Anchor::TopLeft => p.x.floor() as isize,
            Anchor::Center => p.x.round() as isize - len / 2,
        };
        if row < 0 || row as usize >= self.rows {
            return;
        }
        let fg = Rgb::from_color(color);
        for (i, ch) in text.chars().enumerate() {
            let c = col + i as isize;
            if c >= 0 && (c as usize) < self.cols {
                self.glyphs.insert((c as usize, row as usize), Glyph { ch, fg });
            }
        }
    }

    fn sprite(&mut self, kind: SpriteKind, rect: &Rect) {
        let at = |dx: i32, dy: i32, w: i32, h: i32| {
            Rect::new(rect.left() + dx, rect.top() + dy, w, h)
        };
        match kind {
            SpriteKind::Road => {
                self.fill_rect(rect, ASPHALT);
                self.fill_rect(&at(0, 0, 14, rect.size.y), VERGE);
                self.fill_rect(&at(rect.size.x - 14, 0, 14, rect.size.y), VERGE);
                self.fill_rect(&at(18, 0, 6, rect.size.y), PAINT);
                self.fill_rect(&at(rect.size.x - 24, 0, 6, rect.size.y), PAINT);
                // Dashed lane dividers scroll with the tile
                for lane in 1..3 {
                    let x = rect.size.x * lane / 3 - 3;
                    let mut y = 0;
                    while y < rect.size.y {
                        self.fill_rect(&at(x, y, 6, 40), PAINT);
                        y += 80;
                    }
                }
            }
            SpriteKind::Motorcycle => {
                let (w, h) = (rect.size.x, rect.size.y);
                self.fill_rect(&at(w / 2 - 5, 0, 10, h / 5), TYRE);
                self.fill_rect(&at(w / 2 - 5, h * 4 / 5, 10, h / 5), TYRE);
                self.fill_rect(&at(w / 2 - 10, h / 6, 20, h * 2 / 3), BIKE);
                self.fill_rect(&at(4, h / 4, w - 8, 6), BIKE);
                self.fill_rect(&at(w / 2 - 8, h / 3, 16, 18), RIDER);
            }
            SpriteKind::Car => {
                let (w, h) = (rect.size.x, rect.size.y);
                self.fill_rect(&at(4, 0, w - 8, h), CAR_BODY);
                self.fill_rect(&at(0, h / 6, 6, h / 6), TYRE);
                self.fill_rect(&at(w - 6, h / 6, 6, h / 6), TYRE);
                self.fill_rect(&at(0, h * 2 / 3, 6, h / 6), TYRE);
                self.fill_rect(&at(w - 6, h * 2 / 3, 6, h / 6), TYRE);
                // Oncoming, so the windshield faces down
                self.fill_rect(&at(12, h * 3 / 5, w - 24, h / 6), GLASS);
                self.fill_rect(&at(14, h / 8, w - 28, h / 8), GLASS);
            }
        }
    }

    fn draw(&mut self, cmd: &DrawCommand) {
        match cmd {
            DrawCommand::Clear(color) => self.px.fill(Rgb::from_color(*color)),
            DrawCommand::FillRect { rect, color } => self.blend_rect(rect, *color),
            DrawCommand::Polygon { points, color } => self.fill_polygon(points, *color),
            DrawCommand::Sprite { kind, rect } => self.sprite(*kind, rect),
            DrawCommand::Text {
                text,
                pos,
                color,
                anchor,
                ..
            } => self.text(text, *pos, *color, *anchor),
        }
    }

    fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let mut prev: Option<(Rgb, Rgb)> = None;

        for row in 0..self.rows {
            queue!(out, cursor::MoveTo(0, row as u16))?;
            for col in 0..self.cols {
                let top = self.px[row * 2 * self.cols + col];
                let bot = self.px[(row * 2 + 1) * self.cols + col];
                let (ch, fg, bg) = match self.glyphs.get(&(col, row)) {
                    Some(g) => (g.ch, g.fg, top),
                    None => ('▀', top, bot),
                };
                if prev != Some((fg, bg)) {
                    queue!(
                        out,
                        style::SetForegroundColor(fg.term()),
                        style::SetBackgroundColor(bg.term())
                    )?;
                    prev = Some((fg, bg));
                }
                queue!(out, style::Print(ch))?;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

/// Point-in-convex-polygon, either winding
fn convex_contains(verts: &[Vec2], p: Vec2) -> bool {
    let mut sign = 0.0f32;
    for (i, a) in verts.iter().enumerate() {
        let b = verts[(i + 1) % verts.len()];
        let cross = (b - *a).perp_dot(p - *a);
        if cross != 0.0 {
            if sign != 0.0 && cross.signum() != sign {
                return false;
            }
            sign = cross.signum();
        }
    }
    true
}

/// Press time and repeat count of a key held without release reporting
#[derive(Debug, Clone, Copy)]
struct Held {
    last_seen: Instant,
    repeats: u32,
}

/// Synthesized key releases for terminals that only report presses
#[derive(Debug, Default)]
struct HeldKeys {
    keys: HashMap<Key, Held>,
}

impl HeldKeys {
    fn press(&mut self, key: Key, now: Instant) {
        self.keys
            .entry(key)
            .and_modify(|held| {
                held.last_seen = now;
                held.repeats += 1;
            })
            .or_insert(Held {
                last_seen: now,
                repeats: 0,
            });
    }

    fn expire(&mut self, now: Instant, events: &mut Vec<InputEvent>) {
        self.keys.retain(|key, held| {
            let timeout = if held.repeats == 0 {
                TAP_TIMEOUT
            } else {
                REPEAT_TIMEOUT
            };
            let alive = now.duration_since(held.last_seen) < timeout;
            if !alive {
                events.push(InputEvent::Release(*key));
            }
            alive
        });
    }
}

/// Raw-mode terminal session; restores the terminal on drop
pub struct Terminal {
    out: Stdout,
    release_events: bool,
    held: HeldKeys,
}

impl Terminal {
    pub fn open() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if release_events {
            execute!(
                out,
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
        }
        log::info!("Terminal opened (key release events: {})", release_events);

        Ok(Self {
            out,
            release_events,
            held: HeldKeys::default(),
        })
    }

    /// Drain pending events without blocking
    pub fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.translate(key, &mut events);
            }
        }
        if !self.release_events {
            self.held.expire(Instant::now(), &mut events);
        }
        Ok(events)
    }

    fn translate(&mut self, key: KeyEvent, events: &mut Vec<InputEvent>) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            events.push(InputEvent::Quit);
            return;
        }

        let lateral = match key.code {
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            _ => None,
        };
        if let Some(k) = lateral {
            match key.kind {
                KeyEventKind::Release => {
                    events.push(InputEvent::Release(k));
                }
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    if !self.release_events {
                        self.held.press(k, Instant::now());
                    }
                    events.push(InputEvent::Press(k));
                }
            }
            return;
        }

        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Enter => events.push(InputEvent::Press(Key::Enter)),
            KeyCode::Esc => events.push(InputEvent::Press(Key::Escape)),
            KeyCode::Backspace => events.push(InputEvent::Press(Key::Backspace)),
            KeyCode::Char(c) => events.push(InputEvent::Char(c)),
            _ => {}
        }
    }

    /// Rasterize and show one frame
    pub fn present(&mut self, cmds: &[DrawCommand]) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        let mut canvas = Canvas::new(cols, rows);
        for cmd in cmds {
            canvas.draw(cmd);
        }
        canvas.render(&mut self.out)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.release_events {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(
            self.out,
            style::ResetColor,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Audio through the terminal: the crash rings the bell, music is silent
#[derive(Debug, Default)]
pub struct TerminalAudio {
    muted: bool,
    music_playing: bool,
}

impl TerminalAudio {
    pub fn new(muted: bool) -> Self {
        Self {
            muted,
            music_playing: false,
        }
    }

    pub fn music_playing(&self) -> bool {
        self.music_playing
    }
}

impl AudioSink for TerminalAudio {
    fn start_music(&mut self) {
        self.music_playing = true;
        log::debug!("Music started");
    }

    fn stop_music(&mut self) {
        self.music_playing = false;
        log::debug!("Music stopped");
    }

    fn play(&mut self, effect: SoundEffect) {
        if self.muted {
            return;
        }
        match effect {
            SoundEffect::Crash => {
                let mut out = stdout();
                let _ = out.write_all(b"\x07");
                let _ = out.flush();
            }
        }
    }
}
