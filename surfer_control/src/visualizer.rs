//! Software-rendered overlay using `minifb`.
//!
//! Layout (frame-sized window):
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │ FPS: 30                      [hand] [cool] │
//! │ Swipe Right                                │
//! │                                            │
//! │              skeleton of each hand         │
//! │                                            │
//! │ [T][I][M][R][P]                            │
//! │ status line                                │
//! │ key legend                                 │
//! └────────────────────────────────────────────┘
//! ```
//!
//! The window also owns the keyboard/mouse that drive the simulated hand:
//! presses are translated to [`SimInput`]s and sent to the sim source.

use std::sync::mpsc::Sender;

use anyhow::anyhow;
use gesture_core::landmarks::{HAND_CONNECTIONS, TIP_IDS};
use gesture_core::{Finger, FingerState, HandLandmarks};
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use crate::source::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Colors
// ════════════════════════════════════════════════════════════════════════════

const BG_COLOR:     u32 = 0xFF101418;
const BONE_COLOR:   u32 = 0xFFDDDDDD;
const JOINT_COLOR:  u32 = 0xFFE04040;
const TIP_COLOR:    u32 = 0xFF40E0E0;
const LABEL_OK:     u32 = 0xFF00FF00;  // swipes / jump
const LABEL_ALERT:  u32 = 0xFFFF0000;  // hoverboard / roll
const FPS_COLOR:    u32 = 0xFF4060FF;
const TEXT_BG:      u32 = 0xFF0F3460;
const FINGER_UP:    u32 = 0xFF30C050;
const FINGER_DOWN:  u32 = 0xFF404040;

// ════════════════════════════════════════════════════════════════════════════
// Overlay: per-frame snapshot handed to render()
// ════════════════════════════════════════════════════════════════════════════

pub struct Overlay<'a> {
    pub hands:        &'a [HandLandmarks],
    pub fingers:      Option<FingerState>,
    pub label:        Option<&'a str>,
    /// Draw the label in the alert color.
    pub alert:        bool,
    pub fps:          f64,
    pub hand_present: bool,
    pub cooling_down: bool,
    pub status:       &'a str,
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    buf:        Vec<u32>,
    w:          usize,
    h:          usize,
    sim_tx:     Sender<SimInput>,
    last_mouse: Option<(f32, f32)>,
}

impl Visualizer {
    pub fn new(sim_tx: Sender<SimInput>, w: usize, h: usize) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "Subway Surfers Gesture Control",
            w, h,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("failed to open window: {e}"))?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; w * h],
            w,
            h,
            sim_tx,
            last_mouse: None,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Poll keyboard and mouse, translate to SimInput events.
    /// Returns false when the user asked to quit.
    pub fn poll_input(&mut self) -> bool {
        if !self.window.is_open() { return false; }

        let pressed = |k: Key| self.window.is_key_pressed(k, KeyRepeat::No);

        if pressed(Key::Q) || pressed(Key::Escape) {
            return false;
        }

        let mut inputs = Vec::new();
        for (key, finger) in [
            (Key::T, Finger::Thumb),
            (Key::I, Finger::Index),
            (Key::M, Finger::Middle),
            (Key::R, Finger::Ring),
            (Key::P, Finger::Pinky),
        ] {
            if pressed(key) {
                inputs.push(SimInput::ToggleFinger(finger));
            }
        }
        if pressed(Key::O)    { inputs.push(SimInput::Pose(FingerState::OPEN)); }
        if pressed(Key::F)    { inputs.push(SimInput::Pose(FingerState::CLOSED)); }
        if pressed(Key::Key1) { inputs.push(SimInput::Pose(FingerState::from_bits([0, 1, 0, 0, 0]))); }
        if pressed(Key::Key2) { inputs.push(SimInput::Pose(FingerState::from_bits([0, 1, 1, 0, 0]))); }
        if pressed(Key::H)    { inputs.push(SimInput::ToggleHand); }

        // The hand follows the pointer while it is inside the window.
        if let Some((mx, my)) = self.window.get_mouse_pos(MouseMode::Discard) {
            let pos = (mx / self.w as f32, my / self.h as f32);
            if self.last_mouse != Some(pos) {
                self.last_mouse = Some(pos);
                inputs.push(SimInput::MoveTo { x: pos.0, y: pos.1 });
            }
        }

        // Non-sim sources dropped the receiver; sends just fail.
        for input in inputs {
            let _ = self.sim_tx.send(input);
        }
        true
    }

    /// Render one frame.
    pub fn render(&mut self, o: &Overlay<'_>) {
        self.buf.fill(BG_COLOR);

        for hand in o.hands {
            self.draw_hand(hand);
        }

        // ── FPS and action label (positions match the classic overlay) ────
        self.draw_text(&format!("FPS: {}", o.fps as i64), 10, 30 - 15, 3, FPS_COLOR);
        if let Some(label) = o.label {
            let color = if o.alert { LABEL_ALERT } else { LABEL_OK };
            self.draw_text(label, 10, 70 - 15, 4, color);
        }

        // ── Presence / cooldown lamps ─────────────────────────────────────
        let lamp_x = self.w.saturating_sub(90);
        self.fill_rect(lamp_x, 10, 36, 16, if o.hand_present { FINGER_UP } else { FINGER_DOWN });
        self.draw_text("HAND", lamp_x + 2, 15, 1, 0xFF000000);
        self.fill_rect(lamp_x + 42, 10, 36, 16, if o.cooling_down { LABEL_ALERT } else { FINGER_DOWN });
        self.draw_text("COOL", lamp_x + 44, 15, 1, 0xFF000000);

        // ── Finger-state bits ─────────────────────────────────────────────
        let bits_y = self.h.saturating_sub(80);
        if let Some(state) = o.fingers {
            for (i, finger) in Finger::ALL.iter().enumerate() {
                let x = 10 + i * 26;
                let color = if state.is_up(*finger) { FINGER_UP } else { FINGER_DOWN };
                self.fill_rect(x, bits_y, 22, 22, color);
                self.draw_text(&finger_letter(*finger).to_string(), x + 8, bits_y + 6, 2, 0xFF000000);
            }
        }

        // ── Status bar ────────────────────────────────────────────────────
        let status_y = self.h.saturating_sub(44);
        self.fill_rect(0, status_y, self.w, 44, TEXT_BG);
        self.draw_text(o.status, 10, status_y + 8, 2, 0xFFEEEEEE);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_text(
            "T/I/M/R/P=finger  O=open  F=fist  1=point  2=peace  H=hide  mouse=move  Q=quit",
            10, self.h.saturating_sub(14), 1, 0xFF888888,
        );

        self.window.update_with_buffer(&self.buf, self.w, self.h).ok();
    }

    // ── Hand skeleton ─────────────────────────────────────────────────────

    fn draw_hand(&mut self, hand: &HandLandmarks) {
        let (w, h) = (self.w as f32, self.h as f32);
        let px = |i: usize| {
            let p = hand.get(i);
            ((p.x * w) as isize, (p.y * h) as isize)
        };

        for &(a, b) in HAND_CONNECTIONS.iter() {
            let (p0, p1) = (px(a), px(b));
            self.draw_line(p0, p1, BONE_COLOR);
        }
        for i in 0..hand.points.len() {
            let color = if TIP_IDS.contains(&i) { TIP_COLOR } else { JOINT_COLOR };
            self.draw_dot(px(i), 3, color);
        }
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(self.h) {
            for col in x..(x+w).min(self.w) {
                self.buf[row * self.w + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: isize, y: isize, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.buf[y as usize * self.w + x as usize] = color;
        }
    }

    /// Bresenham line.
    fn draw_line(&mut self, (x0, y0): (isize, isize), (x1, y1): (isize, isize), color: u32) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    fn draw_dot(&mut self, (cx, cy): (isize, isize), r: isize, color: u32) {
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r {
                    self.set_pixel(cx + dx, cy + dy, color);
                }
            }
        }
    }

    /// 3×5 bitmap font, each pixel drawn as a `scale`×`scale` block.
    fn draw_text(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        self.fill_rect(cx + col * scale, y + row * scale, scale, scale, color);
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > self.w { break; }
        }
    }
}

fn finger_letter(f: Finger) -> char {
    match f {
        Finger::Thumb  => 'T',
        Finger::Index  => 'I',
        Finger::Middle => 'M',
        Finger::Ring   => 'R',
        Finger::Pinky  => 'P',
    }
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
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}
