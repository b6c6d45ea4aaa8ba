// Copyright (c) 2026 rezky_nightky

//! Error types for startup and the render loop.

use thiserror::Error;

/// Failures while bringing up the terminal session.
#[derive(Debug, Error)]
pub enum InitError {
    /// Standard output is not an interactive terminal.
    #[error("Requires TTY.")]
    NotATty,

    /// The terminal is below the minimum geometry.
    #[error("Terminal too small: {width}x{height}. Minimum size: {min_width}x{min_height}.")]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },

    /// The terminal type cannot be driven.
    #[error(
        "Cannot initialize terminal (TERM={0}). Ensure TERM is set and you're running in a supported terminal."
    )]
    UnsupportedTerminal(String),

    /// The terminal control layer failed.
    #[error("Cannot initialize terminal: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RainError {
    #[error(transparent)]
    Init(#[from] InitError),

    /// Display failure inside the render loop.
    #[error("Display error: {0}")]
    Io(#[from] std::io::Error),
}

impl RainError {
    pub fn exit_code(&self) -> i32 {
        1
    }
}
