//! Terminal writer: a short-lived batch of relative terminal operations.
//!
//! Design invariants:
//! * Commands preserve ordering; nothing reaches the terminal before `flush`.
//! * Cursor motion is relative (up/down/right, carriage return). The only absolute motion is
//!   `ClearScreen`, used by an explicit full repaint.
//! * A zero-distance move emits nothing (`CSI 0 A` moves one row on most terminals).
//! * Writer owns no global state; it is a short-lived object per paint.

use crossterm::{
    cursor::{Hide, MoveDown, MoveRight, MoveTo, MoveUp, Show},
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Up(u16),
    Down(u16),
    Right(u16),
    /// `\r`
    LineStart,
    /// `\r\n`: next row, scrolling the terminal when already on the bottom row.
    NewRow,
    Print(String),
    /// Erase from the cursor to the end of the row.
    ClearRow,
    /// Erase from the cursor to the end of the screen.
    ClearBelow,
    /// Home + erase the whole screen.
    ClearScreen,
    HideCursor,
    ShowCursor,
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new() }
    }

    pub fn up(&mut self, n: usize) {
        if n > 0 {
            self.cmds.push(Command::Up(clamp_u16(n)));
        }
    }

    pub fn down(&mut self, n: usize) {
        if n > 0 {
            self.cmds.push(Command::Down(clamp_u16(n)));
        }
    }

    pub fn right(&mut self, n: usize) {
        if n > 0 {
            self.cmds.push(Command::Right(clamp_u16(n)));
        }
    }

    pub fn line_start(&mut self) {
        self.cmds.push(Command::LineStart);
    }

    pub fn new_row(&mut self) {
        self.cmds.push(Command::NewRow);
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if s.is_empty() {
            return;
        }
        if let Some(Command::Print(prev)) = self.cmds.last_mut() {
            prev.push_str(&s);
        } else {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn clear_row(&mut self) {
        self.cmds.push(Command::ClearRow);
    }

    pub fn clear_below(&mut self) {
        self.cmds.push(Command::ClearBelow);
    }

    pub fn clear_screen(&mut self) {
        self.cmds.push(Command::ClearScreen);
    }

    pub fn hide_cursor(&mut self) {
        self.cmds.push(Command::HideCursor);
    }

    pub fn show_cursor(&mut self) {
        self.cmds.push(Command::ShowCursor);
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn flush<W: Write>(self, out: &mut W) -> io::Result<()> {
        for c in self.cmds {
            match c {
                Command::Up(n) => queue!(out, MoveUp(n))?,
                Command::Down(n) => queue!(out, MoveDown(n))?,
                Command::Right(n) => queue!(out, MoveRight(n))?,
                Command::LineStart => queue!(out, Print("\r"))?,
                Command::NewRow => queue!(out, Print("\r\n"))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::ClearRow => queue!(out, Clear(ClearType::UntilNewLine))?,
                Command::ClearBelow => queue!(out, Clear(ClearType::FromCursorDown))?,
                Command::ClearScreen => queue!(out, MoveTo(0, 0), Clear(ClearType::All))?,
                Command::HideCursor => queue!(out, Hide)?,
                Command::ShowCursor => queue!(out, Show)?,
            }
        }
        out.flush()
    }
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}
