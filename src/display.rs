//! Rendering layer: all terminal I/O lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! game.  No game logic is performed; world coordinates are scaled onto
//! the terminal grid and drawn with crossterm commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use rand::Rng;
use sky_flyer::audio::AudioSink;
use sky_flyer::entities::{
    CollectibleKind, Entity, EntityKind, ObstacleKind, PlayState, Player, PowerUpKind, Viewport,
};
use sky_flyer::scene::{Game, Scene};
use sky_flyer::session::GameSession;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_SHIELD: Color = Color::Cyan;
const C_CLOUD: Color = Color::Grey;
const C_KITTEN: Color = Color::Magenta;
const C_BOULDER: Color = Color::DarkYellow;
const C_ROLL: Color = Color::Yellow;
const C_COFFEE: Color = Color::DarkRed;
const C_STAR: Color = Color::Yellow;
const C_POWERUP: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;
const C_BANNER: Color = Color::Cyan;

/// Rows reserved above (HUD + top border) and below (bottom border + hint).
const TOP_ROWS: u16 = 2;
const BOTTOM_ROWS: u16 = 2;

/// Maps world coordinates onto the playfield inside the border.
#[derive(Clone, Copy)]
struct Grid {
    cols: u16,
    rows: u16,
    world: Viewport,
}

impl Grid {
    fn new(cols: u16, rows: u16, world: Viewport) -> Self {
        Grid { cols, rows, world }
    }

    fn field_cols(&self) -> u16 {
        self.cols.saturating_sub(2)
    }

    fn field_rows(&self) -> u16 {
        self.rows.saturating_sub(TOP_ROWS + BOTTOM_ROWS)
    }

    /// Terminal cell for a world point, or `None` if it lies off the field.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let fx = x / self.world.width * f32::from(self.field_cols());
        let fy = y / self.world.height * f32::from(self.field_rows());
        if fx < 0.0 || fy < 0.0 {
            return None;
        }
        let (cx, cy) = (fx as u16, fy as u16);
        if cx >= self.field_cols() || cy >= self.field_rows() {
            return None;
        }
        Some((cx + 1, cy + TOP_ROWS))
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write, A: AudioSink, R: Rng>(
    out: &mut W,
    game: &Game<A, R>,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let grid = Grid::new(cols, rows, game.viewport());

    match game.scene() {
        Scene::Welcome => draw_welcome(out, cols, rows)?,
        Scene::Menu => draw_menu(out, game, cols, rows)?,
        Scene::Play(state) => {
            draw_border(out, cols, rows)?;
            draw_hud(out, game.session(), cols)?;
            draw_play(out, state, game.session(), grid)?;
            draw_controls_hint(out, rows, "SPACE / ↑ : Flap   M : Mute   Q : Menu")?;
            if let Some(banner) = game.banner() {
                draw_centered(out, cols, (rows / 2).saturating_sub(1), &banner.text, C_BANNER)?;
            }
        }
        Scene::GameOver { score, level } => draw_game_over(out, *score, *level, cols, rows)?,
        Scene::Win { score } => draw_win(out, *score, cols, rows)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let w = cols as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, rows.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..rows.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &GameSession, cols: u16) -> std::io::Result<()> {
    let snap = session.snapshot();

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>6}", snap.score)))?;

    let level_str = format!(
        "[ {} · {} ]",
        snap.level_number,
        snap.level_name.as_deref().unwrap_or("-")
    );
    let lx = (cols / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    // Active power-ups + lives, right-aligned
    let mut power_tag = String::new();
    for (kind, secs) in snap.power_up_seconds() {
        let label = match kind {
            PowerUpKind::Shield => "SHIELD",
            PowerUpKind::Speed => "SPEED",
            PowerUpKind::Magnet => "MAGNET",
        };
        power_tag.push_str(&format!("[{} {:>2}s] ", label, secs));
    }
    let lives_str = format!("Lives:{}", "♥".repeat(snap.lives as usize));
    let width = power_tag.chars().count() + lives_str.chars().count();
    let rx = cols.saturating_sub(width as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;

    if !power_tag.is_empty() {
        out.queue(style::SetForegroundColor(C_POWERUP))?;
        out.queue(Print(&power_tag))?;
    }
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_play<W: Write>(
    out: &mut W,
    state: &PlayState,
    session: &GameSession,
    grid: Grid,
) -> std::io::Result<()> {
    for e in state.pools.obstacles() {
        let (glyph, color) = match e.kind {
            ObstacleKind::CloudMonster => ("☁", C_CLOUD),
            ObstacleKind::FlyingKitten => ("ᓚ", C_KITTEN),
            ObstacleKind::Boulder => ("●", C_BOULDER),
        };
        draw_entity(out, e, grid, glyph, color)?;
    }
    for e in state.pools.collectibles.iter() {
        let (glyph, color) = match e.kind {
            CollectibleKind::CinnamonRoll => ("@", C_ROLL),
            CollectibleKind::CoffeeCup => ("c", C_COFFEE),
            CollectibleKind::Star => ("★", C_STAR),
        };
        draw_entity(out, e, grid, glyph, color)?;
    }
    for e in state.pools.power_ups.iter() {
        let glyph = match e.kind {
            PowerUpKind::Shield => "◆",
            PowerUpKind::Speed => "»",
            PowerUpKind::Magnet => "U",
        };
        draw_entity(out, e, grid, glyph, C_POWERUP)?;
    }

    draw_player(out, &state.player, session, state.frame, grid)
}

/// Collected entities keep drawing, dimmed, until their fade ends.
fn draw_entity<W: Write, K: EntityKind>(
    out: &mut W,
    e: &Entity<K>,
    grid: Grid,
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    if !e.is_visible() {
        return Ok(());
    }
    if let Some((col, row)) = grid.cell(e.x, e.y) {
        let color = if e.active { color } else { C_HINT };
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(glyph))?;
    }
    Ok(())
}

fn draw_player<W: Write>(
    out: &mut W,
    player: &Player,
    session: &GameSession,
    frame: u64,
    grid: Grid,
) -> std::io::Result<()> {
    // Blink while invincible
    if player.is_invincible() && frame % 4 < 2 {
        return Ok(());
    }
    let Some((col, row)) = grid.cell(player.x, player.y) else {
        return Ok(());
    };

    let sprite = if player.flap_pose_ms > 0 { ">^>" } else { ">o>" };
    out.queue(cursor::MoveTo(col.saturating_sub(1).max(1), row))?;
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    out.queue(Print(sprite))?;

    if session.is_power_up_active(PowerUpKind::Shield) {
        out.queue(style::SetForegroundColor(C_SHIELD))?;
        out.queue(cursor::MoveTo(col.saturating_sub(2).max(1), row))?;
        out.queue(Print("("))?;
        out.queue(cursor::MoveTo(col + 2, row))?;
        out.queue(Print(")"))?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, rows: u16, hint: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

fn draw_centered<W: Write>(
    out: &mut W,
    cols: u16,
    row: u16,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    let col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Screens ───────────────────────────────────────────────────────────────────

fn draw_welcome<W: Write>(out: &mut W, cols: u16, rows: u16) -> std::io::Result<()> {
    let cy = rows / 2;
    draw_centered(out, cols, cy.saturating_sub(3), "☁  SKY  FLYER  ☁", Color::Cyan)?;
    draw_centered(out, cols, cy.saturating_sub(1), "Flap through the clouds, grab the treats.", Color::White)?;
    draw_centered(out, cols, cy + 2, "Press any key", C_HINT)?;
    Ok(())
}

fn draw_menu<W: Write, A: AudioSink, R: Rng>(
    out: &mut W,
    game: &Game<A, R>,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let cx = cols / 2;
    let cy = rows / 2;
    draw_centered(out, cols, cy.saturating_sub(6), "☁  SKY  FLYER  ☁", Color::Cyan)?;

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy.saturating_sub(4)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Levels:"))?;

    let current = game.session().current_level_index();
    for (i, level) in game.catalog().iter().enumerate() {
        let row = cy.saturating_sub(3) + i as u16;
        let color = if i == current { Color::Yellow } else { C_HINT };
        let target = match level.target_score_to_advance() {
            Some(t) => format!("{} pts", t),
            None => "endless".to_string(),
        };
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(format!("{}. {:<18} {}", i + 1, level.name, target)))?;
    }

    let legend_row = cy + game.catalog().len() as u16;
    let legend: &[(&str, Color, &str)] = &[
        ("@ c ★", C_STAR, " treats    — 10 / 5 / 25 points"),
        ("◆", C_POWERUP, " Shield   — absorbs one hit"),
        ("»", C_POWERUP, " Speed    — stronger flaps"),
        ("U", C_POWERUP, " Magnet   — pulls treats in"),
    ];
    for (i, (sym, color, desc)) in legend.iter().enumerate() {
        out.queue(cursor::MoveTo(cx.saturating_sub(14), legend_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(sym))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(*desc))?;
    }

    draw_controls_hint(out, rows, "SPACE / ENTER : Start   M : Mute   Q : Quit")
}

fn draw_result_box<W: Write>(
    out: &mut W,
    lines: &[(&str, Color)],
    details: &[String],
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let total_rows = lines.len() + details.len() + 1;
    let start_row = (rows / 2).saturating_sub(total_rows as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        draw_centered(out, cols, start_row + i as u16, msg, *color)?;
    }
    let mut row = start_row + lines.len() as u16;
    for line in details {
        draw_centered(out, cols, row, line, Color::Yellow)?;
        row += 1;
    }
    draw_centered(out, cols, row, "SPACE - Play Again  ESC - Title  Q - Quit", Color::White)
}

fn draw_game_over<W: Write>(
    out: &mut W,
    score: u32,
    level: usize,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
    ];
    let details = [
        format!("Final Score: {:>6}", score),
        format!("Level reached: {}", level),
    ];
    draw_result_box(out, lines, &details, cols, rows)
}

fn draw_win<W: Write>(out: &mut W, score: u32, cols: u16, rows: u16) -> std::io::Result<()> {
    let lines: &[(&str, Color)] = &[
        ("╔════════════════════╗", Color::Green),
        ("║  ★  YOU  WIN!  ★   ║", Color::Green),
        ("╚════════════════════╝", Color::Green),
    ];
    let details = [format!("Final Score: {:>6}", score)];
    draw_result_box(out, lines, &details, cols, rows)
}
