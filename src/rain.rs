// Copyright (c) 2026 rezky_nightky

use rand::Rng;
use tracing::debug;

use crate::cell::Cell;
use crate::column::Column;
use crate::config::RainConfig;
use crate::frame::Frame;
use crate::glyphs::GlyphPool;
use crate::runtime::{Geometry, Level};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub mutated: usize,
    pub respawned: usize,
}

/// One visible glyph of the rain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RainCell {
    pub x: u16,
    pub y: u16,
    pub ch: char,
    pub level: Level,
}

/// Owns every falling column and advances them in lockstep.
pub struct Rain<R: Rng> {
    geometry: Geometry,
    config: RainConfig,
    pool: GlyphPool,
    columns: Vec<Column>,
    rng: R,
}

impl<R: Rng> Rain<R> {
    /// Builds the rain already at full density.
    pub fn new(geometry: Geometry, config: RainConfig, rng: R) -> Self {
        let mut rain = Self {
            geometry,
            config,
            pool: GlyphPool::matrix(),
            columns: Vec::new(),
            rng,
        };
        rain.initialize();
        rain
    }

    pub fn initialize(&mut self) {
        let target = self.config.target_columns(self.geometry.width);
        self.columns.clear();
        self.columns.reserve(target);
        for _ in 0..target {
            let x = self.random_x();
            let mut col = Column::spawn(x, &self.config, &self.pool, &mut self.rng);
            col.scatter(self.geometry.height, &mut self.rng);
            self.columns.push(col);
        }
        debug!(
            columns = target,
            width = self.geometry.width,
            height = self.geometry.height,
            "rain initialized"
        );
    }

    fn random_x(&mut self) -> u16 {
        self.rng.random_range(0..self.geometry.width.max(1))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Advances, mutates, then replaces retired columns in place.
    pub fn tick(&mut self, delta_time: f64) -> TickStats {
        let height = self.geometry.height;
        let mut stats = TickStats::default();

        for col in &mut self.columns {
            col.advance(delta_time, self.config.base_speed);
        }
        for col in &mut self.columns {
            stats.mutated += col.mutate(
                self.config.mutation_probability,
                height,
                &self.pool,
                &mut self.rng,
            );
        }

        let width = self.geometry.width.max(1);
        for col in &mut self.columns {
            if col.is_retired(height) {
                let x = self.rng.random_range(0..width);
                *col = Column::spawn(x, &self.config, &self.pool, &mut self.rng);
                stats.respawned += 1;
            }
        }

        if stats.respawned > 0 {
            debug!(respawned = stats.respawned, "columns retired");
        }
        stats
    }

    /// Every visible glyph, column by column.
    pub fn cells(&self) -> impl Iterator<Item = RainCell> + '_ {
        let height = self.geometry.height;
        self.columns.iter().flat_map(move |col| {
            let x = col.x();
            col.visible_cells(height)
                .map(move |(y, ch, level)| RainCell { x, y, ch, level })
        })
    }

    /// Draws the rain into a cleared frame. Where columns overlap, the
    /// brighter glyph wins. The bottom-right cell stays blank because
    /// printing there scrolls some terminals.
    pub fn render(&self, frame: &mut Frame) {
        let corner = (
            self.geometry.width.saturating_sub(1),
            self.geometry.height.saturating_sub(1),
        );
        for c in self.cells() {
            if (c.x, c.y) == corner {
                continue;
            }
            frame.merge(c.x, c.y, Cell::new(c.ch, c.level));
        }
    }
}
