// Copyright (c) 2026 rezky_nightky

/// Color capability of the attached terminal, fixed at session open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    Color8,
    Color256,
}

/// Brightness class of a rendered cell, ordered from dark to bright.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Gone,
    DimTrail,
    MidTrail,
    BrightTrail,
    Head,
}

impl Level {
    pub fn is_visible(self) -> bool {
        self != Level::Gone
    }
}

/// Terminal dimensions captured once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
}

impl Geometry {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_order_from_dark_to_bright() {
        assert!(Level::Gone < Level::DimTrail);
        assert!(Level::DimTrail < Level::MidTrail);
        assert!(Level::MidTrail < Level::BrightTrail);
        assert!(Level::BrightTrail < Level::Head);
        assert!(!Level::Gone.is_visible());
    }
}
