//! Rendering layer: all terminal output lives here.
//!
//! Each function receives a mutable writer and an immutable view of the
//! session.  No game logic is performed; this module only scales the arena
//! onto the terminal grid and translates state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use glam::Vec2;
use mamma_mia::compute::combat::melee_region;
use mamma_mia::entities::{
    Enemy, EnemyStatus, Facing, GameSession, GameStatus, MafiaLook, PickupKind,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkYellow;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_WEAPON: Color = Color::Cyan;
const C_MAMMA: Color = Color::Magenta;
const C_PIN: Color = Color::DarkYellow;
const C_SWING: Color = Color::Yellow;
const C_MAFIA: [Color; 3] = [Color::White, Color::Yellow, Color::Red];
const C_DAZED: Color = Color::DarkGrey;
const C_BULLET: Color = Color::Cyan;
const C_GRENADE: Color = Color::Green;
const C_EXPLOSION: Color = Color::DarkYellow;
const C_PICKUP_GUN: Color = Color::Blue;
const C_PICKUP_GRENADES: Color = Color::Green;
const C_POPUP: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

/// Arena-to-terminal mapping.  The play field sits inside the border, between
/// the HUD row at the top and the hint row at the bottom.
struct View {
    cols: u16,
    rows: u16,
    scale: Vec2,
}

impl View {
    fn new(session: &GameSession, cols: u16, rows: u16) -> Self {
        let inner_w = f32::from(cols.saturating_sub(3).max(1));
        let inner_h = f32::from(rows.saturating_sub(5).max(1));
        Self {
            cols,
            rows,
            scale: Vec2::new(
                inner_w / session.tuning.arena_width,
                inner_h / session.tuning.arena_height,
            ),
        }
    }

    fn cell(&self, pos: Vec2) -> (i32, i32) {
        (
            1 + (pos.x * self.scale.x).round() as i32,
            2 + (pos.y * self.scale.y).round() as i32,
        )
    }

    /// True when `len` cells starting at (x, y) fit inside the border.
    fn fits(&self, x: i32, y: i32, len: usize) -> bool {
        x >= 1
            && y >= 2
            && x + len as i32 <= i32::from(self.cols) - 1
            && y <= i32::from(self.rows) - 3
    }
}

/// Draw `text` at (x, y) if it lies entirely inside the play field.
fn put<W: Write>(
    out: &mut W,
    view: &View,
    x: i32,
    y: i32,
    text: &str,
    color: Color,
) -> std::io::Result<()> {
    if !view.fits(x, y, text.chars().count()) {
        return Ok(());
    }
    out.queue(cursor::MoveTo(x as u16, y as u16))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame onto a `cols` × `rows` terminal.
pub fn render<W: Write>(
    out: &mut W,
    session: &GameSession,
    cols: u16,
    rows: u16,
) -> std::io::Result<()> {
    let view = View::new(session, cols, rows);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, session, &view)?;

    for explosion in &session.explosions {
        draw_explosion(out, &view, explosion.pos, explosion.radius)?;
    }
    for pickup in &session.pickups {
        let (x, y) = view.cell(pickup.pos);
        let (label, color) = match pickup.kind {
            PickupKind::Gun => ("[G]", C_PICKUP_GUN),
            PickupKind::Grenades => ("[O]", C_PICKUP_GRENADES),
        };
        put(out, &view, x - 1, y, label, color)?;
    }
    for enemy in &session.enemies {
        draw_enemy(out, &view, enemy)?;
    }
    for projectile in &session.projectiles {
        let (x, y) = view.cell(projectile.pos);
        put(out, &view, x, y, "•", C_BULLET)?;
    }
    for grenade in &session.grenades {
        let (x, y) = view.cell(grenade.pos);
        put(out, &view, x, y, "●", C_GRENADE)?;
    }

    draw_mamma(out, session, &view)?;

    for popup in &session.popups {
        let (x, y) = view.cell(popup.pos);
        let text = format!("+{}", popup.value);
        put(out, &view, x - 1, y - 2, &text, C_POPUP)?;
    }

    draw_controls_hint(out, &view)?;

    if session.status == GameStatus::GameOver {
        draw_game_over(out, session, &view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    let w = view.cols as usize;
    let h = view.rows;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.cols.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &GameSession, view: &View) -> std::io::Result<()> {
    // Score: left
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!(
        "Score: {:>6}  Best: {:>6}",
        session.score, session.best_score
    )))?;

    // Weapons: centre
    let player = &session.player;
    let mut weapons = String::from("Pin");
    if player.has_gun() {
        weapons.push_str(&format!(" + Gun {}s", player.gun_ms.div_ceil(1000)));
    }
    if player.grenades > 0 {
        weapons.push_str(&format!(" + Grenades ×{}", player.grenades));
    }
    let wx = (view.cols / 2).saturating_sub(weapons.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(wx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_WEAPON))?;
    out.queue(Print(&weapons))?;

    // Lives: right
    let hearts: String = "♥".repeat(player.lives as usize);
    let lives_text = format!("Lives: {}", hearts);
    let rx = view
        .cols
        .saturating_sub(lives_text.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_text))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_mamma<W: Write>(out: &mut W, session: &GameSession, view: &View) -> std::io::Result<()> {
    let player = &session.player;

    // The rolling pin sweeps its whole reach while the swing lasts.
    if player.is_swinging() {
        let region = melee_region(player, &session.tuning);
        let (x0, y0) = view.cell(region.min);
        let (x1, y1) = view.cell(region.max);
        for y in y0..=y1 {
            for x in x0..=x1 {
                put(out, view, x, y, "~", C_SWING)?;
            }
        }
    }

    // Blink while invulnerable.
    if player.is_invulnerable() && (session.frame / 3) % 2 == 1 {
        return Ok(());
    }

    // Sprite (3 rows, 3 cols):
    //  ◠‿◠      ← head   (bun and smile)
    //  /█\      ← apron
    //  / \      ← legs, alternating while walking
    let (x, y) = view.cell(player.pos);
    let face = match player.facing {
        Facing::Left => "◠‿ ",
        Facing::Right => " ‿◠",
        Facing::Up => " ▀ ",
        Facing::Down => "◠‿◠",
    };
    put(out, view, x - 1, y - 1, face, C_MAMMA)?;
    put(out, view, x - 1, y, "/█\\", C_MAMMA)?;
    let legs = if (player.stride / 4) % 2 == 0 { "/ \\" } else { " | " };
    put(out, view, x - 1, y + 1, legs, C_MAMMA)?;

    // Rolling pin on the facing side
    match player.facing {
        Facing::Left => put(out, view, x - 3, y, "═", C_PIN)?,
        Facing::Right => put(out, view, x + 2, y, "═", C_PIN)?,
        Facing::Up => put(out, view, x + 2, y - 1, "║", C_PIN)?,
        Facing::Down => put(out, view, x + 2, y + 1, "║", C_PIN)?,
    }

    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, view: &View, enemy: &Enemy) -> std::io::Result<()> {
    // Row -1:  hat        (style by look)
    // Row  0:  face       (mood by status)
    // Row -2:  health bar (tough ones only)
    let (x, y) = view.cell(enemy.pos);
    let tier = enemy.max_health.clamp(1, 3) as usize;
    let color = match enemy.status {
        EnemyStatus::Pursuing => C_MAFIA[tier - 1],
        _ => C_DAZED,
    };

    let hat = match enemy.look {
        MafiaLook::Fedora => "▄█▄",
        MafiaLook::FlatCap => "▄▄▖",
        MafiaLook::Bowler => "(▀)",
    };
    let face = match enemy.status {
        EnemyStatus::Pursuing => "ò_ó",
        EnemyStatus::KnockedBack { .. } => "x_x",
        EnemyStatus::Dazed { .. } => "@_@",
    };
    put(out, view, x - 1, y - 1, hat, color)?;
    put(out, view, x - 1, y, face, color)?;

    if enemy.max_health > 1 {
        let bar: String = (0..enemy.max_health)
            .map(|i| if i < enemy.health { '▪' } else { '·' })
            .collect();
        put(out, view, x - 1, y - 2, &bar, C_HUD_LIVES)?;
    }
    Ok(())
}

fn draw_explosion<W: Write>(
    out: &mut W,
    view: &View,
    pos: Vec2,
    radius: f32,
) -> std::io::Result<()> {
    let (x0, y0) = view.cell(pos - Vec2::splat(radius));
    let (x1, y1) = view.cell(pos + Vec2::splat(radius));
    for y in y0..=y1 {
        for x in x0..=x1 {
            // Back to arena space to test the circle.
            let arena = Vec2::new(
                (x - 1) as f32 / view.scale.x,
                (y - 2) as f32 / view.scale.y,
            );
            if arena.distance(pos) <= radius {
                put(out, view, x, y, "░", C_EXPLOSION)?;
            }
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, view: &View) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "←↑↓→ / WASD : Move   SPACE : Pin   F : Shoot   G : Grenade   Q : Quit",
    ))?;
    Ok(())
}

// ── Game-over overlay ─────────────────────────────────────────────────────────

fn draw_game_over<W: Write>(
    out: &mut W,
    session: &GameSession,
    view: &View,
) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", session.score);
    let best_line = format!("Best: {}", session.best_score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
        (best_line.as_str(), Color::Yellow),
        ("R - Play Again  Q - Quit", Color::White),
    ];

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
