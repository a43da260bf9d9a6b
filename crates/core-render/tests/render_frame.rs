//! Frame engine behavior against a recording surface: scroll policy,
//! region clipping, sentinel rendering, and cursor lifecycle.

use anyhow::Result;
use core_events::InputEvent;
use core_render::{RenderEngine, END_OF_TEXT};
use core_state::EditorState;
use core_terminal::{CellStyle, Surface};
use core_text::Line;

#[derive(Debug, Clone, PartialEq)]
struct Draw {
    x: u16,
    y: u16,
    text: String,
    style: CellStyle,
}

#[derive(Default)]
struct FakeSurface {
    draws: Vec<Draw>,
    scrolls: Vec<i32>,
    refuse_blit: bool,
}

impl FakeSurface {
    fn text_draws(&self) -> Vec<&Draw> {
        self.draws
            .iter()
            .filter(|d| d.style == CellStyle::Text)
            .collect()
    }

    fn cursor_draws(&self) -> Vec<&Draw> {
        self.draws
            .iter()
            .filter(|d| d.style == CellStyle::Cursor)
            .collect()
    }

    fn reset(&mut self) {
        self.draws.clear();
        self.scrolls.clear();
    }
}

impl Surface for FakeSurface {
    fn enter(&mut self) -> Result<()> {
        Ok(())
    }
    fn leave(&mut self) -> Result<()> {
        Ok(())
    }
    fn set_title(&mut self, _title: &str) -> Result<()> {
        Ok(())
    }
    fn size(&mut self) -> Result<(u16, u16)> {
        Ok((20, 11))
    }
    fn next_event(&mut self) -> Result<InputEvent> {
        anyhow::bail!("fake surface has no events")
    }
    fn clear(&mut self) -> Result<()> {
        Ok(())
    }
    fn draw_text(&mut self, x: u16, y: u16, text: &str, style: CellStyle) -> Result<()> {
        self.draws.push(Draw {
            x,
            y,
            text: text.to_string(),
            style,
        });
        Ok(())
    }
    fn scroll_rows(&mut self, delta: i32) -> Result<bool> {
        if self.refuse_blit {
            return Ok(false);
        }
        self.scrolls.push(delta);
        Ok(true)
    }
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

fn state_with(lines: &[&str], cols: usize, rows: usize) -> EditorState {
    let mut state = EditorState::new();
    for l in lines {
        state.doc.push_line(Line::from(*l));
    }
    state.view.resize(cols, rows);
    state
}

fn numbered(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("line {i}")).collect()
}

#[test]
fn full_frame_paints_text_sentinel_blanks_and_status() {
    let mut state = state_with(&["hi"], 10, 4);
    state.damage.mark_full();
    let mut surface = FakeSurface::default();
    let mut engine = RenderEngine::new();
    engine.render(&mut state, &mut surface).unwrap();

    let texts = surface.text_draws();
    assert_eq!(texts.len(), 4);
    assert_eq!(texts[0].text, "hi        ");
    assert_eq!((texts[0].x, texts[0].y), (0, 1));
    assert_eq!(texts[1].text, &END_OF_TEXT[..10]);
    assert_eq!(texts[2].text, " ".repeat(10));
    assert_eq!(texts[3].text, " ".repeat(10));

    let status: Vec<_> = surface
        .draws
        .iter()
        .filter(|d| d.style == CellStyle::Status)
        .collect();
    assert_eq!(status.len(), 1);
    assert_eq!((status[0].x, status[0].y), (0, 0));
    assert!(status[0].text.starts_with("col=1"));

    let cursors = surface.cursor_draws();
    assert_eq!(cursors.len(), 1);
    assert_eq!((cursors[0].x, cursors[0].y), (0, 1));
    assert_eq!(cursors[0].text, "h");
}

#[test]
fn one_row_scroll_blits_and_paints_only_the_strip() {
    let lines = numbered(50);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let mut state = state_with(&refs, 20, 10);
    state.cursor.row = 10; // one row below the bottom edge
    let mut surface = FakeSurface::default();
    let mut engine = RenderEngine::new();
    engine.render(&mut state, &mut surface).unwrap();

    assert_eq!(surface.scrolls, vec![1]);
    assert_eq!(state.view.origin_row, 1);
    let texts = surface.text_draws();
    assert_eq!(texts.len(), 1, "only the revealed strip repaints");
    assert_eq!(texts[0].text.trim_end(), "line 10");
    assert_eq!(texts[0].y, 10);
}

#[test]
fn far_jump_repaints_everything_without_blit() {
    let lines = numbered(50);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let mut state = state_with(&refs, 20, 10);
    state.cursor.row = 30;
    let mut surface = FakeSurface::default();
    let mut engine = RenderEngine::new();
    engine.render(&mut state, &mut surface).unwrap();

    assert!(surface.scrolls.is_empty());
    assert_eq!(surface.text_draws().len(), 10);
    assert_eq!(state.view.origin_row, 21);
}

#[test]
fn horizontal_shift_forces_full_repaint() {
    let mut state = state_with(&["a very long line of text beyond the viewport"], 20, 10);
    state.cursor.col = 25;
    let mut surface = FakeSurface::default();
    let mut engine = RenderEngine::new();
    engine.render(&mut state, &mut surface).unwrap();

    assert!(surface.scrolls.is_empty());
    assert_eq!(state.view.origin_col, 6);
    assert_eq!(surface.text_draws().len(), 10);
}

#[test]
fn surface_without_blit_gets_a_full_repaint() {
    let lines = numbered(50);
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    let mut state = state_with(&refs, 20, 10);
    state.cursor.row = 10;
    let mut surface = FakeSurface {
        refuse_blit: true,
        ..FakeSurface::default()
    };
    let mut engine = RenderEngine::new();
    engine.render(&mut state, &mut surface).unwrap();

    assert!(surface.scrolls.is_empty());
    assert_eq!(surface.text_draws().len(), 10);
}

#[test]
fn cursor_hidden_when_unfocused_or_processing() {
    let mut state = state_with(&["hi"], 10, 4);
    state.focused = false;
    state.damage.mark_full();
    let mut surface = FakeSurface::default();
    let mut engine = RenderEngine::new();
    engine.render(&mut state, &mut surface).unwrap();
    assert!(surface.cursor_draws().is_empty());

    state.focused = true;
    state.input_disabled = true;
    surface.reset();
    engine.render(&mut state, &mut surface).unwrap();
    assert!(surface.cursor_draws().is_empty());
}

#[test]
fn old_cursor_cell_is_erased_on_the_next_frame() {
    let mut state = state_with(&["hi"], 10, 4);
    let mut surface = FakeSurface::default();
    let mut engine = RenderEngine::new();
    engine.render(&mut state, &mut surface).unwrap();
    assert_eq!(surface.cursor_draws().len(), 1);

    state.cursor.col = 1;
    surface.reset();
    engine.render(&mut state, &mut surface).unwrap();
    // First draw of the frame restores the old cell as plain text.
    assert_eq!(
        surface.draws[0],
        Draw {
            x: 0,
            y: 1,
            text: "h".to_string(),
            style: CellStyle::Text,
        }
    );
    let cursors = surface.cursor_draws();
    assert_eq!((cursors[0].x, cursors[0].y), (1, 1));
    assert_eq!(cursors[0].text, "i");
}

#[test]
fn damage_rect_repaints_only_its_rows() {
    let mut state = state_with(&["aaa", "bbb", "ccc"], 10, 5);
    state
        .damage
        .mark(core_state::DamageRect::line_tail(1, 1));
    let mut surface = FakeSurface::default();
    let mut engine = RenderEngine::new();
    engine.render(&mut state, &mut surface).unwrap();

    let texts = surface.text_draws();
    assert_eq!(texts.len(), 1);
    assert_eq!((texts[0].x, texts[0].y), (1, 2));
    assert_eq!(texts[0].text, "bb       ");
}
