// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[cfg(test)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Writes `cell` at (x, y); out-of-bounds writes are dropped.
    #[cfg(test)]
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Keeps whichever of the existing and the new cell is brighter.
    pub fn merge(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            if cell.level > self.cells[i].level {
                self.cells[i] = cell;
            }
        }
    }
}

/// A single cell the display must repaint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellWrite {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

/// What was last drawn and what should be drawn now.
pub struct FrameBuffer {
    previous: Frame,
    current: Frame,
}

impl FrameBuffer {
    /// Both grids start blank, matching a freshly cleared screen.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            previous: Frame::new(width, height),
            current: Frame::new(width, height),
        }
    }

    /// Clears and hands out the grid for the frame being built.
    pub fn begin_frame(&mut self) -> &mut Frame {
        self.current.clear();
        &mut self.current
    }

    /// Lists every cell that differs from the last emitted frame, in
    /// row-major order, then makes the current frame the previous one.
    pub fn diff_and_emit(&mut self) -> Vec<CellWrite> {
        let width = self.current.width as usize;
        let mut writes = Vec::new();
        for (i, (now, before)) in self
            .current
            .cells
            .iter()
            .zip(self.previous.cells.iter())
            .enumerate()
        {
            if now != before {
                writes.push(CellWrite {
                    x: (i % width) as u16,
                    y: (i / width) as u16,
                    cell: *now,
                });
            }
        }
        std::mem::swap(&mut self.previous, &mut self.current);
        writes
    }

    #[cfg(test)]
    pub fn previous(&self) -> &Frame {
        &self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::Level;

    fn cell(ch: char, level: Level) -> Cell {
        Cell::new(ch, level)
    }

    fn paint(buf: &mut FrameBuffer, cells: &[(u16, u16, Cell)]) -> Vec<CellWrite> {
        let frame = buf.begin_frame();
        for &(x, y, c) in cells {
            frame.set(x, y, c);
        }
        buf.diff_and_emit()
    }

    #[test]
    fn blank_over_blank_emits_nothing() {
        let mut buf = FrameBuffer::new(4, 3);
        assert!(paint(&mut buf, &[]).is_empty());
    }

    #[test]
    fn same_frame_twice_emits_nothing_the_second_time() {
        let mut buf = FrameBuffer::new(5, 5);
        let a = [
            (1, 1, cell('a', Level::Head)),
            (1, 0, cell('b', Level::BrightTrail)),
        ];
        assert_eq!(paint(&mut buf, &a).len(), 2);
        assert!(paint(&mut buf, &a).is_empty());
    }

    #[test]
    fn reverting_restores_exactly_the_changed_cells() {
        let mut buf = FrameBuffer::new(6, 4);
        let a = [
            (0, 0, cell('a', Level::Head)),
            (2, 1, cell('b', Level::MidTrail)),
            (5, 3, cell('c', Level::DimTrail)),
        ];
        let b = [
            (0, 0, cell('a', Level::Head)),
            (2, 1, cell('z', Level::MidTrail)),
            (3, 2, cell('d', Level::Head)),
        ];
        paint(&mut buf, &a);
        let to_b = paint(&mut buf, &b);
        let back = paint(&mut buf, &a);

        let pos = |w: &[CellWrite]| w.iter().map(|w| (w.x, w.y)).collect::<Vec<_>>();
        assert_eq!(pos(&to_b), vec![(2, 1), (3, 2), (5, 3)]);
        assert_eq!(pos(&back), pos(&to_b));
        assert_eq!(back[0].cell, cell('b', Level::MidTrail));
        assert_eq!(back[1].cell, Cell::BLANK);
        assert_eq!(back[2].cell, cell('c', Level::DimTrail));
    }

    #[test]
    fn level_change_alone_is_a_write() {
        let mut buf = FrameBuffer::new(2, 2);
        paint(&mut buf, &[(0, 0, cell('q', Level::Head))]);
        let w = paint(&mut buf, &[(0, 0, cell('q', Level::BrightTrail))]);
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].cell.level, Level::BrightTrail);
    }

    #[test]
    fn emptied_cell_emits_a_blank_write() {
        let mut buf = FrameBuffer::new(3, 3);
        paint(&mut buf, &[(2, 2, cell('x', Level::DimTrail))]);
        let w = paint(&mut buf, &[]);
        assert_eq!(
            w,
            vec![CellWrite {
                x: 2,
                y: 2,
                cell: Cell::BLANK
            }]
        );
        assert!(buf.previous().get(2, 2).is_some_and(Cell::is_blank));
    }

    #[test]
    fn writes_come_out_row_major_with_edge_coordinates() {
        let mut buf = FrameBuffer::new(3, 2);
        let w = paint(
            &mut buf,
            &[
                (2, 1, cell('d', Level::Head)),
                (0, 1, cell('c', Level::Head)),
                (2, 0, cell('b', Level::Head)),
                (0, 0, cell('a', Level::Head)),
            ],
        );
        let chars: String = w.iter().map(|w| w.cell.ch).collect();
        assert_eq!(chars, "abcd");
        assert_eq!((w[3].x, w[3].y), (2, 1));
    }

    #[test]
    fn out_of_bounds_writes_are_dropped_and_merge_keeps_brightest() {
        let mut f = Frame::new(2, 2);
        f.set(2, 0, cell('x', Level::Head));
        f.set(0, 2, cell('x', Level::Head));
        assert_eq!(f, Frame::new(2, 2));

        f.merge(1, 1, cell('d', Level::DimTrail));
        f.merge(1, 1, cell('h', Level::Head));
        f.merge(1, 1, cell('m', Level::MidTrail));
        assert_eq!(f.get(1, 1).map(|c| c.ch), Some('h'));
    }
}
