// Copyright (c) 2026 rezky_nightky

use rand::Rng;

const ASCII_GLYPHS: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!@#$%^&*()_+-=[]{}|;:',.<>?/";

// Half-width katakana: one terminal cell each, unlike the full-width block.
const KATAKANA_START: u32 = 0xFF66;
const KATAKANA_END: u32 = 0xFF9D;

fn push_range(out: &mut Vec<char>, start: u32, end: u32) {
    for v in start..=end {
        if let Some(ch) = char::from_u32(v) {
            out.push(ch);
        }
    }
}

/// The fixed set of glyphs the rain samples from.
#[derive(Clone, Debug)]
pub struct GlyphPool {
    glyphs: Vec<char>,
}

impl GlyphPool {
    /// Katakana followed by ASCII letters, digits and punctuation.
    pub fn matrix() -> Self {
        let mut glyphs = Vec::with_capacity(160);
        push_range(&mut glyphs, KATAKANA_START, KATAKANA_END);
        glyphs.extend(ASCII_GLYPHS.chars());
        Self { glyphs }
    }

    #[cfg(test)]
    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains(&ch)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> char {
        self.glyphs[rng.random_range(0..self.glyphs.len())]
    }
}
