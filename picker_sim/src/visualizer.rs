//! Software-rendered touch surface using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌───────────────────────────┐
//! │ status line               │
//! │                           │
//! │   ┌───────────────────┐   │
//! │   │  challenge card   │   │
//! │   └───────────────────┘   │
//! │        ( )   ( )          │  finger markers
//! │                           │
//! │ key legend                │
//! └───────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use finger_picker::presentation::{CARD_COLOR, CARD_HEIGHT, CARD_RADIUS, CARD_WIDTH_RATIO};
use finger_picker::{Point, RenderModel};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use crate::error::SimError;
use crate::input::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Look
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:     u32 = 0xFF1A1A2E;
const TEXT_COLOR:   u32 = 0xFFEEEEEE;
const CARD_TEXT:    u32 = 0xFF222222;
const LEGEND_COLOR: u32 = 0xFF888888;
const FLASH_COLOR:  u32 = 0xFFFFFFFF;
const CARD_SCALE:   usize = 3;

const FINGER_KEYS: [Key; 9] = [
    Key::Key1, Key::Key2, Key::Key3, Key::Key4, Key::Key5,
    Key::Key6, Key::Key7, Key::Key8, Key::Key9,
];

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:    Window,
    buf:       Vec<u32>,
    width:     usize,
    height:    usize,
    sim_tx:    Sender<SimInput>,
    last_drag: Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>, width: usize, height: usize) -> Result<Self, SimError> {
        let mut window = Window::new(
            "Finger Picker",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            sim_tx,
            last_drag: None,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse and forward them as [`SimInput`]s.
    /// Returns false when the window should close.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        if self.window.is_key_pressed(Key::Q, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::Quit);
            return false;
        }
        if self.window.is_key_pressed(Key::C, KeyRepeat::No) {
            let _ = self.sim_tx.send(SimInput::CancelAll);
        }

        let cursor = self.window.get_mouse_pos(MouseMode::Clamp);

        if let Some((x, y)) = cursor {
            for (i, &key) in FINGER_KEYS.iter().enumerate() {
                if self.window.is_key_pressed(key, KeyRepeat::No) {
                    let _ = self.sim_tx.send(SimInput::FingerKey {
                        slot: i as u8 + 1,
                        at:   Point::new(x, y),
                    });
                }
            }
        }

        if self.window.get_mouse_down(MouseButton::Left) {
            if let Some(pos) = cursor {
                if self.last_drag != Some(pos) {
                    self.last_drag = Some(pos);
                    let _ = self.sim_tx.send(SimInput::Drag(Point::new(pos.0, pos.1)));
                }
            }
        } else {
            self.last_drag = None;
        }

        true
    }

    /// Render one frame.
    pub fn render(&mut self, model: &RenderModel, now: Duration, status: &str, flash: bool) {
        self.buf.fill(BG_COLOR);

        // ── Challenge card ────────────────────────────────────────────────
        if let Some(card) = &model.card {
            self.draw_card(&card.text);
        }

        // ── Finger markers ────────────────────────────────────────────────
        for m in &model.markers {
            let radius  = m.size / 2.0 * m.scale_at(now);
            let opacity = m.opacity_at(now);
            self.fill_circle(m.center, radius, m.color, opacity);
        }

        // ── Haptic flash ──────────────────────────────────────────────────
        if flash {
            for inset in 0..4 {
                self.draw_border(inset, inset, self.width - 2 * inset, self.height - 2 * inset, FLASH_COLOR);
            }
        }

        // ── Status + legend ───────────────────────────────────────────────
        self.draw_label(status, 10, 12, 2, TEXT_COLOR);
        self.draw_label("1-9=finger at cursor  drag=move  C=cancel  Q=quit", 10, self.height - 14, 1, LEGEND_COLOR);

        if let Err(e) = self.window.update_with_buffer(&self.buf, self.width, self.height) {
            log::warn!("frame dropped: {}", e);
        }
    }

    // ── Card ──────────────────────────────────────────────────────────────

    fn draw_card(&mut self, text: &str) {
        let w  = (self.width as f32 * CARD_WIDTH_RATIO) as usize;
        let h  = CARD_HEIGHT as usize;
        let x0 = (self.width - w) / 2;
        let y0 = self.height.saturating_sub(h) / 2;
        self.fill_rounded_rect(x0, y0, w, h, CARD_RADIUS as usize, CARD_COLOR);

        let glyph_w = 4 * CARD_SCALE;
        let per_line = (w.saturating_sub(20) / glyph_w).max(1);
        let lines = wrap(text, per_line);
        let line_h = 7 * CARD_SCALE;
        let block_h = lines.len() * line_h;
        let mut ly = y0 + h.saturating_sub(block_h) / 2;
        for line in &lines {
            let lw = line.chars().count() * glyph_w;
            let lx = x0 + w.saturating_sub(lw) / 2;
            self.draw_label(line, lx, ly, CARD_SCALE, CARD_TEXT);
            ly += line_h;
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_circle(&mut self, center: Point, radius: f32, color: u32, opacity: f32) {
        let alpha = ((color >> 24) as f32 / 255.0) * opacity.clamp(0.0, 1.0);
        let r2 = radius * radius;
        let y_min = (center.y - radius).floor().max(0.0) as usize;
        let y_max = ((center.y + radius).ceil().max(0.0) as usize).min(self.height);
        let x_min = (center.x - radius).floor().max(0.0) as usize;
        let x_max = ((center.x + radius).ceil().max(0.0) as usize).min(self.width);
        for y in y_min..y_max {
            for x in x_min..x_max {
                let dx = x as f32 + 0.5 - center.x;
                let dy = y as f32 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    let i = y * self.width + x;
                    self.buf[i] = blend(self.buf[i], color, alpha);
                }
            }
        }
    }

    fn fill_rounded_rect(&mut self, x: usize, y: usize, w: usize, h: usize, r: usize, color: u32) {
        let r = r.min(w / 2).min(h / 2);
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                // Distance into the nearest corner square, if any.
                let cx = if col < x + r { Some(x + r - col) } else if col >= x + w - r { Some(col + 1 + r - (x + w)) } else { None };
                let cy = if row < y + r { Some(y + r - row) } else if row >= y + h - r { Some(row + 1 + r - (y + h)) } else { None };
                if let (Some(dx), Some(dy)) = (cx, cy) {
                    if dx * dx + dy * dy > r * r { continue; }
                }
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.width) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.height) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    /// Minimal 3×5 bitmap font, each pixel drawn as a `scale`×`scale` block.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) == 0 { continue; }
                    for sy in 0..scale {
                        for sx in 0..scale {
                            self.set_pixel(cx + col * scale + sx, y + row * scale + sy, color);
                        }
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > self.width { break; }
        }
    }
}

/// Greedy word wrap to at most `width` characters per line.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() { line.push(' '); }
        line.push_str(word);
    }
    if !line.is_empty() { lines.push(line); }
    lines
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b011, 0b000, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t) as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("Do ten jumping jacks while everyone counts", 12);
        assert!(lines.iter().all(|l| l.chars().count() <= 12));
        assert_eq!(lines.join(" "), "Do ten jumping jacks while everyone counts");
    }

    #[test]
    fn wrap_keeps_long_words_whole() {
        assert_eq!(wrap("supercalifragilistic", 5), vec!["supercalifragilistic"]);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 0.0), 0xFF000000);
        assert_eq!(blend(0xFF000000, 0xFFFFFFFF, 1.0), 0xFFFFFFFF);
    }

    #[test]
    fn glyphs_fit_three_bits() {
        for c in "abcdefghijklmnopqrstuvwxyz0123456789!?.,:-/='".chars() {
            assert!(char_glyph(c).iter().all(|&row| row <= 0b111), "glyph {:?}", c);
        }
    }
}
