// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::{ColorMode, Level};

const HEAD_RGB: (u8, u8, u8) = (255, 255, 255);
const BRIGHT_RGB: (u8, u8, u8) = (0, 255, 0);
const MID_RGB: (u8, u8, u8) = (0, 215, 0);
const DIM_RGB: (u8, u8, u8) = (0, 175, 0);

/// Concrete terminal attributes for one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bold: bool,
}

#[derive(Clone, Debug)]
pub struct Palette {
    mode: ColorMode,
    styles: [Style; 5],
}

impl Palette {
    pub fn new(mode: ColorMode) -> Self {
        let styles = [
            Level::Gone,
            Level::DimTrail,
            Level::MidTrail,
            Level::BrightTrail,
            Level::Head,
        ]
        .map(|level| style_for(level, mode));
        Self { mode, styles }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn style(&self, level: Level) -> Style {
        self.styles[level as usize]
    }
}

fn level_rgb(level: Level) -> Option<(u8, u8, u8)> {
    match level {
        Level::Gone => None,
        Level::DimTrail => Some(DIM_RGB),
        Level::MidTrail => Some(MID_RGB),
        Level::BrightTrail => Some(BRIGHT_RGB),
        Level::Head => Some(HEAD_RGB),
    }
}

pub fn style_for(level: Level, mode: ColorMode) -> Style {
    let Some((r, g, b)) = level_rgb(level) else {
        return Style {
            fg: None,
            bold: false,
        };
    };
    match mode {
        ColorMode::Color256 => Style {
            fg: Some(Color::AnsiValue(rgb_to_ansi256(r, g, b))),
            bold: level == Level::Head,
        },
        // Without a green ramp, bold separates the two brightest levels.
        ColorMode::Color8 => Style {
            fg: Some(rgb_to_basic(r, g, b)),
            bold: level >= Level::BrightTrail,
        },
    }
}

fn dist2(r0: u8, g0: u8, b0: u8, r1: u8, g1: u8, b1: u8) -> i32 {
    let dr = (r0 as i32) - (r1 as i32);
    let dg = (g0 as i32) - (g1 as i32);
    let db = (b0 as i32) - (b1 as i32);
    (dr * dr) + (dg * dg) + (db * db)
}

fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let r6 = ((r as u16 * 5) + 127) / 255;
    let g6 = ((g as u16 * 5) + 127) / 255;
    let b6 = ((b as u16 * 5) + 127) / 255;

    let cr = CUBE_LEVELS[r6 as usize];
    let cg = CUBE_LEVELS[g6 as usize];
    let cb = CUBE_LEVELS[b6 as usize];
    let cube_idx = 16 + (36 * r6 as u8) + (6 * g6 as u8) + (b6 as u8);
    let cube_dist = dist2(r, g, b, cr, cg, cb);

    let avg = ((r as u16 + g as u16 + b as u16) / 3) as u8;
    let gray_idx = if avg < 8 {
        16
    } else if avg > 238 {
        231
    } else {
        232 + ((avg - 8) / 10)
    };
    let (gr, gg, gb) = if gray_idx == 16 {
        (0, 0, 0)
    } else if gray_idx == 231 {
        (255, 255, 255)
    } else {
        let v = 8 + 10 * (gray_idx - 232);
        (v, v, v)
    };
    let gray_dist = dist2(r, g, b, gr, gg, gb);

    if gray_dist < cube_dist {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_basic(r: u8, g: u8, b: u8) -> Color {
    const TABLE: [(Color, (u8, u8, u8)); 16] = [
        (Color::Black, (0, 0, 0)),
        (Color::DarkRed, (128, 0, 0)),
        (Color::DarkGreen, (0, 128, 0)),
        (Color::DarkYellow, (128, 128, 0)),
        (Color::DarkBlue, (0, 0, 128)),
        (Color::DarkMagenta, (128, 0, 128)),
        (Color::DarkCyan, (0, 128, 128)),
        (Color::Grey, (192, 192, 192)),
        (Color::DarkGrey, (128, 128, 128)),
        (Color::Red, (255, 0, 0)),
        (Color::Green, (0, 255, 0)),
        (Color::Yellow, (255, 255, 0)),
        (Color::Blue, (0, 0, 255)),
        (Color::Magenta, (255, 0, 255)),
        (Color::Cyan, (0, 255, 255)),
        (Color::White, (255, 255, 255)),
    ];

    let mut best = Color::Grey;
    let mut best_d = i32::MAX;
    for (c, (cr, cg, cb)) in TABLE {
        let d = dist2(r, g, b, cr, cg, cb);
        if d < best_d {
            best_d = d;
            best = c;
        }
    }
    best
}
