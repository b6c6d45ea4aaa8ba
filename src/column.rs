// Copyright (c) 2026 rezky_nightky

use std::ops::Range;

use rand::Rng;

use crate::config::RainConfig;
use crate::glyphs::GlyphPool;
use crate::runtime::Level;

/// Fraction of the trail, measured from the head, rendered as bright trail.
pub const BRIGHT_FRACTION: f64 = 0.25;
/// Fraction of the trail, measured from the head, rendered at least mid bright.
pub const MID_FRACTION: f64 = 0.60;

/// A single falling strand of glyphs.
#[derive(Clone, Debug)]
pub struct Column {
    x: u16,
    y_head: f64,
    speed_tier: u8,
    trail_length: u16,
    // Indexed by row offset from the head row; index 0 is the head glyph.
    glyphs: Vec<char>,
}

impl Column {
    /// Spawns a column just above the visible area.
    pub fn spawn<R: Rng>(x: u16, config: &RainConfig, pool: &GlyphPool, rng: &mut R) -> Self {
        let speed_tier = rng.random_range(1..=3u8);
        let (lo, hi) = if config.trail_min <= config.trail_max {
            (config.trail_min, config.trail_max)
        } else {
            (config.trail_max, config.trail_min)
        };
        let trail_length = rng.random_range(lo..=hi);
        let glyphs = (0..=trail_length).map(|_| pool.sample(rng)).collect();
        let y_head = -rng.random::<f64>();

        Self {
            x,
            y_head,
            speed_tier,
            trail_length,
            glyphs,
        }
    }

    /// Places the head anywhere from one trail above the screen down to the
    /// last row, so a freshly started screen is already full of rain.
    pub fn scatter<R: Rng>(&mut self, height: u16, rng: &mut R) {
        let top = -(self.trail_length as f64);
        self.y_head = rng.random_range(top..height.max(1) as f64);
    }

    pub fn x(&self) -> u16 {
        self.x
    }

    #[cfg(test)]
    pub fn y_head(&self) -> f64 {
        self.y_head
    }

    #[cfg(test)]
    pub fn speed_tier(&self) -> u8 {
        self.speed_tier
    }

    #[cfg(test)]
    pub fn trail_length(&self) -> u16 {
        self.trail_length
    }

    pub fn advance(&mut self, delta_time: f64, base_speed: f64) {
        self.y_head += self.speed_tier as f64 * base_speed * delta_time;
    }

    /// Replaces each on-screen trail glyph with probability `probability`.
    /// Returns how many glyphs were replaced.
    pub fn mutate<R: Rng>(
        &mut self,
        probability: f64,
        height: u16,
        pool: &GlyphPool,
        rng: &mut R,
    ) -> usize {
        let head_row = self.y_head.floor() as i64;
        let mut replaced = 0;
        for row in self.visible_rows(height) {
            if rng.random::<f64>() < probability {
                let offset = (head_row - row as i64) as usize;
                if let Some(slot) = self.glyphs.get_mut(offset) {
                    *slot = pool.sample(rng);
                    replaced += 1;
                }
            }
        }
        replaced
    }

    pub fn is_retired(&self, height: u16) -> bool {
        self.y_head - self.trail_length as f64 > height as f64
    }

    pub fn color_level_for(&self, row: i32) -> Level {
        let d = self.y_head - row as f64;
        let trail = self.trail_length as f64;
        if d < 0.0 {
            Level::Gone
        } else if d < 1.0 {
            Level::Head
        } else if d < trail * BRIGHT_FRACTION {
            Level::BrightTrail
        } else if d < trail * MID_FRACTION {
            Level::MidTrail
        } else if d <= trail {
            Level::DimTrail
        } else {
            Level::Gone
        }
    }

    pub fn glyph_at(&self, row: i32) -> Option<char> {
        let offset = self.y_head.floor() as i64 - row as i64;
        usize::try_from(offset)
            .ok()
            .and_then(|i| self.glyphs.get(i).copied())
    }

    /// On-screen rows covered by the head and its trail.
    pub fn visible_rows(&self, height: u16) -> Range<i32> {
        let top = (self.y_head - self.trail_length as f64).ceil().max(0.0);
        let bottom = (self.y_head.floor() + 1.0).min(height as f64);
        if bottom <= top {
            return 0..0;
        }
        top as i32..bottom as i32
    }

    #[cfg(test)]
    pub fn visible_row_count(&self, height: u16) -> usize {
        self.visible_rows(height).len()
    }

    /// `(row, glyph, level)` for every on-screen row of this column.
    pub fn visible_cells(&self, height: u16) -> impl Iterator<Item = (u16, char, Level)> + '_ {
        self.visible_rows(height).filter_map(move |row| {
            let level = self.color_level_for(row);
            if !level.is_visible() {
                return None;
            }
            self.glyph_at(row).map(|ch| (row as u16, ch, level))
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    fn column(y_head: f64, speed_tier: u8, trail_length: u16) -> Column {
        Column {
            x: 3,
            y_head,
            speed_tier,
            trail_length,
            glyphs: vec!['a'; trail_length as usize + 1],
        }
    }

    #[test]
    fn spawn_assigns_tier_trail_and_glyphs_within_bounds() {
        let cfg = RainConfig::default();
        let pool = GlyphPool::matrix();
        let mut rng = StdRng::seed_from_u64(1);
        let mut tiers = [false; 3];
        for _ in 0..200 {
            let c = Column::spawn(5, &cfg, &pool, &mut rng);
            assert_eq!(c.x(), 5);
            assert!((1..=3).contains(&c.speed_tier()));
            tiers[c.speed_tier() as usize - 1] = true;
            assert!((cfg.trail_min..=cfg.trail_max).contains(&c.trail_length()));
            assert!(c.y_head() <= 0.0 && c.y_head() > -1.0);
            assert_eq!(c.glyphs.len(), c.trail_length() as usize + 1);
            assert!(c.glyphs.iter().all(|&g| pool.contains(g)));
        }
        assert_eq!(tiers, [true; 3]);
    }

    #[test]
    fn advance_is_independent_of_tick_subdivision() {
        for tier in 1..=3u8 {
            let expected = tier as f64 * 8.0 * 1.5;
            let splits: [&[f64]; 4] = [
                &[1.5],
                &[0.5, 0.5, 0.5],
                &[0.1; 15],
                &[1.0 / 30.0; 45],
            ];
            for steps in splits {
                let mut c = column(0.0, tier, 10);
                for &dt in steps {
                    c.advance(dt, 8.0);
                }
                assert!(
                    (c.y_head() - expected).abs() < 1e-9,
                    "tier {} steps {:?} gave {}",
                    tier,
                    steps.len(),
                    c.y_head()
                );
            }
        }
    }

    #[test]
    fn retires_once_the_tail_passes_the_bottom() {
        let mut c = column(30.0, 1, 10);
        assert!(!c.is_retired(20));
        c.y_head = 30.5;
        assert!(c.is_retired(20));
    }

    #[test]
    fn color_fades_monotonically_one_level_at_a_time() {
        for trail in 8..=25u16 {
            for frac in [0.0, 0.3, 0.7, 0.99] {
                let c = column(40.0 + frac, 1, trail);
                let head_row = 40;
                assert_eq!(c.color_level_for(head_row), Level::Head);
                assert_eq!(c.color_level_for(head_row + 1), Level::Gone);

                let mut prev = Level::Head;
                for row in (0..head_row).rev() {
                    let level = c.color_level_for(row);
                    assert!(level <= prev, "trail {} row {}", trail, row);
                    assert!((prev as u8) - (level as u8) <= 1, "trail {} row {}", trail, row);
                    let d = c.y_head() - row as f64;
                    if d > trail as f64 {
                        assert_eq!(level, Level::Gone);
                    } else {
                        assert!(level.is_visible());
                    }
                    prev = level;
                }
            }
        }
    }

    #[test]
    fn every_fade_level_appears_in_a_trail() {
        let c = column(30.0, 1, 12);
        let levels: Vec<Level> = (0..=30).map(|r| c.color_level_for(r)).collect();
        for want in [
            Level::Head,
            Level::BrightTrail,
            Level::MidTrail,
            Level::DimTrail,
            Level::Gone,
        ] {
            assert!(levels.contains(&want), "missing {:?}", want);
        }
    }

    #[test]
    fn visible_rows_clip_to_the_screen() {
        assert_eq!(column(-0.5, 1, 8).visible_rows(20), 0..0);
        assert_eq!(column(3.2, 1, 8).visible_rows(20), 0..4);
        assert_eq!(column(12.0, 1, 8).visible_rows(20), 4..13);
        assert_eq!(column(25.0, 1, 8).visible_rows(20), 17..20);
        assert_eq!(column(40.0, 1, 8).visible_rows(20), 0..0);
    }

    #[test]
    fn visible_cells_carry_the_head_glyph_and_level() {
        let mut c = column(12.4, 2, 8);
        c.glyphs[0] = 'H';
        c.glyphs[1] = 'x';
        let cells: Vec<_> = c.visible_cells(20).collect();
        assert_eq!(cells.len(), 8);
        assert!(cells.contains(&(12, 'H', Level::Head)));
        assert!(cells.contains(&(11, 'x', Level::BrightTrail)));
        assert!(cells.iter().all(|&(_, _, l)| l.is_visible()));
    }

    #[test]
    fn mutate_leaves_off_screen_columns_alone() {
        let pool = GlyphPool::matrix();
        let mut rng = StdRng::seed_from_u64(3);
        let mut above = column(-0.5, 1, 8);
        assert_eq!(above.mutate(1.0, 20, &pool, &mut rng), 0);
        assert!(above.glyphs.iter().all(|&g| g == 'a'));

        let mut partial = column(2.0, 1, 8);
        assert_eq!(partial.mutate(1.0, 20, &pool, &mut rng), 3);
        assert!(partial.glyphs[3..].iter().all(|&g| g == 'a'));
    }

    #[test]
    fn mutation_count_tracks_probability() {
        let pool = GlyphPool::matrix();
        let mut rng = StdRng::seed_from_u64(42);
        let height = 40;
        let mut visible = 0usize;
        let mut mutated = 0usize;
        let mut c = column(0.0, 1, 20);
        for _ in 0..2_000 {
            c.advance(1.0 / 30.0, 8.0);
            if c.is_retired(height) {
                c = column(0.0, 1, 20);
            }
            visible += c.visible_row_count(height);
            mutated += c.mutate(0.10, height, &pool, &mut rng);
        }
        let ratio = mutated as f64 / visible as f64;
        assert!(visible > 10_000);
        assert!((ratio - 0.10).abs() < 0.02, "ratio {}", ratio);
    }

    #[test]
    fn scatter_places_head_between_trail_above_and_bottom() {
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let mut c = column(0.0, 1, 12);
            c.scatter(30, &mut rng);
            assert!(c.y_head() >= -12.0 && c.y_head() < 30.0);
        }
    }
}
