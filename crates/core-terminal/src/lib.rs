//! Display surface abstraction and its crossterm implementation.
//!
//! The editor core talks to a [`Surface`]: it receives input events from
//! it and hands it cell-addressed draw instructions. The crossterm
//! implementation owns raw mode and the alternate screen; the RAII
//! [`SurfaceGuard`] restores the terminal even when the caller unwinds.

use anyhow::Result;
use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers, PointerButton};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        KeyEventKind, MouseEventKind,
    },
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor,
        SetForegroundColor},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, ScrollDown, ScrollUp,
        SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::{Stdout, Write, stdout};

/// How a run of cells is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Ordinary document text.
    Text,
    /// The cursor cell (inverse video).
    Cursor,
    /// The status line.
    Status,
}

/// What the editor needs from a display server: synchronous event
/// delivery, cell-addressed text output, and an optional whole-surface
/// vertical blit for scroll optimization.
pub trait Surface {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Current size in cells (columns, rows).
    fn size(&mut self) -> Result<(u16, u16)>;
    /// Block until the next input event.
    fn next_event(&mut self) -> Result<InputEvent>;
    fn clear(&mut self) -> Result<()>;
    fn draw_text(&mut self, column: u16, row: u16, text: &str, style: CellStyle) -> Result<()>;
    /// Shift the whole surface content up (positive) or down (negative).
    /// Returns `false` when the surface cannot blit; the caller must then
    /// fall back to repainting.
    fn scroll_rows(&mut self, delta: i32) -> Result<bool>;
    fn flush(&mut self) -> Result<()>;
}

pub struct CrosstermSurface {
    out: Stdout,
    entered: bool,
}

impl Default for CrosstermSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermSurface {
    pub fn new() -> Self {
        Self {
            out: stdout(),
            entered: false,
        }
    }

    /// Enter and return a guard that leaves on drop.
    pub fn enter_guard(&mut self) -> Result<SurfaceGuard<'_>> {
        self.enter()?;
        Ok(SurfaceGuard { surface: self })
    }
}

impl Surface for CrosstermSurface {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(
                self.out,
                EnterAlternateScreen,
                EnableMouseCapture,
                EnableFocusChange,
                Hide
            )?;
            self.entered = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(
                self.out,
                DisableFocusChange,
                DisableMouseCapture,
                LeaveAlternateScreen,
                Show
            )?;
            disable_raw_mode()?;
            self.entered = false;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(self.out, SetTitle(title))?;
        Ok(())
    }

    fn size(&mut self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }

    fn next_event(&mut self) -> Result<InputEvent> {
        loop {
            match event::read()? {
                event::Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Some(ev) = translate_key(&key) {
                        return Ok(InputEvent::Key(ev));
                    }
                }
                event::Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(button) = mouse.kind {
                        return Ok(InputEvent::Pointer {
                            column: mouse.column,
                            row: mouse.row,
                            button: translate_button(button),
                        });
                    }
                }
                event::Event::Resize(cols, rows) => return Ok(InputEvent::Resize(cols, rows)),
                event::Event::FocusGained => return Ok(InputEvent::FocusGained),
                event::Event::FocusLost => return Ok(InputEvent::FocusLost),
                _ => {}
            }
        }
    }

    fn clear(&mut self) -> Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        Ok(())
    }

    fn draw_text(&mut self, column: u16, row: u16, text: &str, style: CellStyle) -> Result<()> {
        queue!(self.out, MoveTo(column, row))?;
        match style {
            CellStyle::Text => queue!(self.out, Print(text))?,
            CellStyle::Cursor => queue!(
                self.out,
                SetAttribute(Attribute::Reverse),
                Print(text),
                SetAttribute(Attribute::NoReverse)
            )?,
            CellStyle::Status => queue!(
                self.out,
                SetForegroundColor(Color::White),
                SetBackgroundColor(Color::DarkBlue),
                Print(text),
                ResetColor
            )?,
        }
        Ok(())
    }

    fn scroll_rows(&mut self, delta: i32) -> Result<bool> {
        if delta > 0 {
            queue!(self.out, ScrollUp(delta.min(i32::from(u16::MAX)) as u16))?;
        } else if delta < 0 {
            queue!(self.out, ScrollDown((-delta).min(i32::from(u16::MAX)) as u16))?;
        }
        Ok(true)
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for CrosstermSurface {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Restores the terminal when dropped.
pub struct SurfaceGuard<'a> {
    surface: &'a mut CrosstermSurface,
}

impl SurfaceGuard<'_> {
    pub fn surface(&mut self) -> &mut CrosstermSurface {
        self.surface
    }
}

impl Drop for SurfaceGuard<'_> {
    fn drop(&mut self) {
        let _ = self.surface.leave();
    }
}

fn translate_button(button: event::MouseButton) -> PointerButton {
    match button {
        event::MouseButton::Left => PointerButton::Left,
        event::MouseButton::Middle => PointerButton::Middle,
        event::MouseButton::Right => PointerButton::Right,
    }
}

/// Map a crossterm key event onto the editor's normalized form. Keys the
/// editor has no use for map to `None` and are swallowed by the read loop.
pub fn translate_key(key: &event::KeyEvent) -> Option<KeyEvent> {
    let code = match key.code {
        event::KeyCode::Char(c) => KeyCode::Char(c),
        event::KeyCode::Enter => KeyCode::Enter,
        event::KeyCode::Esc => KeyCode::Esc,
        event::KeyCode::Backspace => KeyCode::Backspace,
        event::KeyCode::Tab => KeyCode::Tab,
        event::KeyCode::BackTab => KeyCode::BackTab,
        event::KeyCode::Up => KeyCode::Up,
        event::KeyCode::Down => KeyCode::Down,
        event::KeyCode::Left => KeyCode::Left,
        event::KeyCode::Right => KeyCode::Right,
        event::KeyCode::Home => KeyCode::Home,
        event::KeyCode::End => KeyCode::End,
        event::KeyCode::PageUp => KeyCode::PageUp,
        event::KeyCode::PageDown => KeyCode::PageDown,
        event::KeyCode::Insert => KeyCode::Insert,
        event::KeyCode::Delete => KeyCode::Delete,
        _ => return None,
    };
    let mut mods = KeyModifiers::empty();
    if key.modifiers.contains(event::KeyModifiers::CONTROL) {
        mods |= KeyModifiers::CTRL;
    }
    if key.modifiers.contains(event::KeyModifiers::ALT) {
        mods |= KeyModifiers::ALT;
    }
    if key.modifiers.contains(event::KeyModifiers::SHIFT) {
        mods |= KeyModifiers::SHIFT;
    }
    // Terminals report Shift+Tab as a distinct key; normalize the modifier
    // so the keymap sees the chord either way.
    if code == KeyCode::BackTab {
        mods |= KeyModifiers::SHIFT;
    }
    Some(KeyEvent::new(code, mods))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(code: event::KeyCode, mods: event::KeyModifiers) -> event::KeyEvent {
        event::KeyEvent::new(code, mods)
    }

    #[test]
    fn translates_plain_and_modified_chars() {
        let ev = translate_key(&raw(event::KeyCode::Char('a'), event::KeyModifiers::NONE)).unwrap();
        assert_eq!(ev, KeyEvent::plain(KeyCode::Char('a')));
        let ev = translate_key(&raw(
            event::KeyCode::Char('q'),
            event::KeyModifiers::CONTROL,
        ))
        .unwrap();
        assert_eq!(ev, KeyEvent::ctrl(KeyCode::Char('q')));
    }

    #[test]
    fn back_tab_always_carries_shift() {
        let ev = translate_key(&raw(event::KeyCode::BackTab, event::KeyModifiers::NONE)).unwrap();
        assert!(ev.mods.contains(KeyModifiers::SHIFT));
        assert_eq!(ev.code, KeyCode::BackTab);
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        assert!(translate_key(&raw(event::KeyCode::F(5), event::KeyModifiers::NONE)).is_none());
    }
}
