// Copyright (c) 2026 rezky_nightky

use crate::runtime::Level;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub level: Level,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        ch: ' ',
        level: Level::Gone,
    };

    pub fn new(ch: char, level: Level) -> Self {
        if level.is_visible() {
            Self { ch, level }
        } else {
            Self::BLANK
        }
    }

    #[cfg(test)]
    pub fn is_blank(&self) -> bool {
        *self == Self::BLANK
    }
}
