// Copyright (c) 2026 rezky_nightky

use std::io::{stdout, IsTerminal, Result, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, ExecutableCommand, QueueableCommand,
};
use tracing::{info, warn};

use crate::config::RainConfig;
use crate::error::InitError;
use crate::frame::CellWrite;
use crate::palette::{Palette, Style};
use crate::runtime::{ColorMode, Geometry};

/// Picks the palette from `TERM` and `COLORTERM`.
pub fn detect_color_mode(
    term: Option<&str>,
    colorterm: Option<&str>,
) -> std::result::Result<ColorMode, InitError> {
    let colorterm = colorterm.unwrap_or_default().to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return Ok(ColorMode::Color256);
    }

    let term = term.map(str::to_ascii_lowercase);
    match term.as_deref() {
        None | Some("") if cfg!(windows) => Ok(ColorMode::Color256),
        None | Some("") => Err(InitError::UnsupportedTerminal("(unset)".to_string())),
        Some("dumb") => Err(InitError::UnsupportedTerminal("dumb".to_string())),
        Some(t) if t.contains("256color") => Ok(ColorMode::Color256),
        Some(_) => Ok(ColorMode::Color8),
    }
}

/// Everything the session needs from the display device.
pub trait Backend {
    fn is_tty(&self) -> bool;
    fn size(&self) -> Result<(u16, u16)>;
    fn color_mode(&self) -> std::result::Result<ColorMode, InitError>;

    fn enable_raw_mode(&mut self) -> Result<()>;
    fn disable_raw_mode(&mut self) -> Result<()>;
    fn enter_alternate_screen(&mut self) -> Result<()>;
    fn leave_alternate_screen(&mut self) -> Result<()>;
    fn hide_cursor(&mut self) -> Result<()>;
    fn show_cursor(&mut self) -> Result<()>;

    fn draw(&mut self, writes: &[CellWrite], palette: &Palette, width: u16) -> Result<()>;

    /// Waits up to `timeout` for input; true when the user asked to quit.
    fn poll_quit(&mut self, timeout: Duration) -> Result<bool>;
}

pub struct CrosstermBackend<W: Write = Stdout> {
    out: W,
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self::with_writer(stdout())
    }
}

impl<W: Write> CrosstermBackend<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    fn set_style(&mut self, style: Style) -> Result<()> {
        self.out
            .queue(SetForegroundColor(style.fg.unwrap_or(Color::Reset)))?;
        self.out.queue(SetAttribute(if style.bold {
            Attribute::Bold
        } else {
            Attribute::NormalIntensity
        }))?;
        Ok(())
    }

    /// Queues the writes, skipping the cursor move whenever a write lands
    /// right after the previous one on the same row.
    fn write_cells(&mut self, writes: &[CellWrite], palette: &Palette, width: u16) -> Result<()> {
        let mut cur_pos: Option<(u16, u16)> = None;
        let mut cur_style: Option<Style> = None;

        for w in writes {
            if cur_pos != Some((w.x, w.y)) {
                self.out.queue(cursor::MoveTo(w.x, w.y))?;
            }

            let style = palette.style(w.cell.level);
            if cur_style != Some(style) {
                self.set_style(style)?;
                cur_style = Some(style);
            }

            self.out.queue(Print(w.cell.ch))?;
            let next_x = w.x.saturating_add(1);
            // Past the last column the cursor position depends on the
            // terminal's pending-wrap handling, so it is not trusted.
            cur_pos = if next_x < width {
                Some((next_x, w.y))
            } else {
                None
            };
        }

        self.out.queue(SetAttribute(Attribute::Reset))?;
        self.out.queue(ResetColor)?;
        self.out.flush()
    }
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn is_quit_key(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

impl Backend for CrosstermBackend {
    fn is_tty(&self) -> bool {
        self.out.is_terminal()
    }

    fn size(&self) -> Result<(u16, u16)> {
        terminal::size()
    }

    fn color_mode(&self) -> std::result::Result<ColorMode, InitError> {
        let term = std::env::var("TERM").ok();
        let colorterm = std::env::var("COLORTERM").ok();
        detect_color_mode(term.as_deref(), colorterm.as_deref())
    }

    fn enable_raw_mode(&mut self) -> Result<()> {
        terminal::enable_raw_mode()
    }

    fn disable_raw_mode(&mut self) -> Result<()> {
        terminal::disable_raw_mode()
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        self.out.execute(terminal::EnterAlternateScreen)?;
        let _ = self.out.execute(terminal::DisableLineWrap);
        self.out.execute(SetAttribute(Attribute::Reset))?;
        self.out.execute(ResetColor)?;
        self.out.execute(terminal::Clear(terminal::ClearType::All))?;
        self.out.flush()
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        let _ = self.out.execute(SetAttribute(Attribute::Reset));
        let _ = self.out.execute(ResetColor);
        let _ = self.out.execute(terminal::EnableLineWrap);
        self.out.execute(terminal::LeaveAlternateScreen)?;
        self.out.flush()
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.out.execute(cursor::Hide)?;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<()> {
        self.out.execute(cursor::Show)?;
        self.out.flush()
    }

    fn draw(&mut self, writes: &[CellWrite], palette: &Palette, width: u16) -> Result<()> {
        self.write_cells(writes, palette, width)
    }

    fn poll_quit(&mut self, timeout: Duration) -> Result<bool> {
        let mut quit = false;
        let mut wait = timeout;
        // Drain everything already queued; resizes are read and dropped.
        while event::poll(wait)? {
            wait = Duration::ZERO;
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Press && is_quit_key(k.code, k.modifiers) {
                    quit = true;
                }
            }
        }
        Ok(quit)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Applied {
    raw_mode: bool,
    alternate_screen: bool,
    cursor_hidden: bool,
}

/// The terminal while the rain owns it. Dropping the session restores the
/// terminal, so every exit path out of the render loop goes through `close`.
pub struct Session<B: Backend> {
    backend: B,
    geometry: Geometry,
    palette: Palette,
    applied: Applied,
    closed: bool,
}

impl<B: Backend> Session<B> {
    /// Validates the terminal, then takes it over. Validation failures
    /// leave the terminal untouched.
    pub fn open(backend: B, config: &RainConfig) -> std::result::Result<Self, InitError> {
        if !backend.is_tty() {
            return Err(InitError::NotATty);
        }

        let (width, height) = backend.size()?;
        if width < config.min_width || height < config.min_height {
            return Err(InitError::TerminalTooSmall {
                width,
                height,
                min_width: config.min_width,
                min_height: config.min_height,
            });
        }

        let color_mode = backend.color_mode()?;

        let mut session = Self {
            backend,
            geometry: Geometry::new(width, height),
            palette: Palette::new(color_mode),
            applied: Applied::default(),
            closed: false,
        };
        // On failure the partially set up session is dropped, which undoes
        // whatever was applied.
        session.take_over()?;

        info!(width, height, ?color_mode, "terminal session opened");
        Ok(session)
    }

    fn take_over(&mut self) -> Result<()> {
        self.backend.enable_raw_mode()?;
        self.applied.raw_mode = true;
        // Entering sends several commands; a failure after the switch still
        // leaves the terminal on the alternate screen, so mark it first.
        self.applied.alternate_screen = true;
        self.backend.enter_alternate_screen()?;
        self.backend.hide_cursor()?;
        self.applied.cursor_hidden = true;
        Ok(())
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn color_mode(&self) -> ColorMode {
        self.palette.mode()
    }

    pub fn draw(&mut self, writes: &[CellWrite]) -> Result<()> {
        self.backend
            .draw(writes, &self.palette, self.geometry.width)
    }

    pub fn poll_quit(&mut self, timeout: Duration) -> Result<bool> {
        self.backend.poll_quit(timeout)
    }

    /// Restores the terminal and reports the first failure, if any.
    pub fn close(mut self) -> Result<()> {
        self.restore()
    }

    fn restore(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let mut first_err = None;
        if self.applied.cursor_hidden {
            if let Err(e) = self.backend.show_cursor() {
                first_err.get_or_insert(e);
            }
            self.applied.cursor_hidden = false;
        }
        if self.applied.alternate_screen {
            if let Err(e) = self.backend.leave_alternate_screen() {
                first_err.get_or_insert(e);
            }
            self.applied.alternate_screen = false;
        }
        if self.applied.raw_mode {
            if let Err(e) = self.backend.disable_raw_mode() {
                first_err.get_or_insert(e);
            }
            self.applied.raw_mode = false;
        }

        match first_err {
            Some(e) => {
                warn!(error = %e, "terminal restore incomplete");
                Err(e)
            }
            None => {
                info!("terminal session closed");
                Ok(())
            }
        }
    }
}

impl<B: Backend> Drop for Session<B> {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
