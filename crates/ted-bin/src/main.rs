//! ted entrypoint: CLI, logging, and the synchronous event loop.

use anyhow::Result;
use clap::Parser;
use core_actions::{QuitChoice, QuitConfirm, dispatch, place_cursor};
use core_config::load_from;
use core_events::{InputEvent, KeyCode};
use core_keymap::Keymap;
use core_render::{RenderEngine, STATUS_ROWS};
use core_state::EditorState;
use core_terminal::{CellStyle, CrosstermSurface, Surface};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "ted", version, about = "Fixed-width terminal text editor")]
struct Args {
    /// Optional path to open at startup. If omitted the editor starts
    /// with an empty, unnamed document.
    pub path: Option<PathBuf>,
    /// Optional configuration file path (overrides discovery of `ted.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging()?;
    install_panic_hook();
    info!(target: "runtime", "startup");

    let config = load_from(args.config.clone())?;
    let mut state = EditorState::new();
    state.doc.set_tab_width(config.tab_width());
    if let Some(path) = &args.path
        && state.open(path).is_err()
    {
        // Keep editing toward the requested path; the status line
        // carries the notice.
        warn!(target: "runtime", path = %path.display(), "could not open file");
    }

    let mut surface = CrosstermSurface::new();
    surface.set_title(&state.display_name())?;
    let mut guard = surface.enter_guard()?;
    run(&mut state, guard.surface())
}

/// The editor loop: one event in, one dispatched command, one frame out.
fn run(state: &mut EditorState, surface: &mut CrosstermSurface) -> Result<()> {
    let keymap = Keymap::editor_default();
    let mut engine = RenderEngine::new();

    let (cols, rows) = surface.size()?;
    apply_resize(state, cols, rows);
    surface.clear()?;
    state.damage.mark_full();
    engine.render(state, surface)?;

    loop {
        match surface.next_event()? {
            InputEvent::Key(key) => {
                let width = state.view.cols;
                let result = {
                    let mut confirm = SurfaceConfirm { surface, width };
                    dispatch(&key, state, &keymap, &mut confirm)
                };
                if result.quit {
                    info!(target: "runtime", "quit");
                    return Ok(());
                }
                if result.consumed {
                    engine.render(state, surface)?;
                }
            }
            InputEvent::Pointer { column, row, .. } => {
                if let Some((col, doc_row)) = screen_to_document(state, column, row) {
                    place_cursor(state, col, doc_row);
                    engine.render(state, surface)?;
                }
            }
            InputEvent::Resize(cols, rows) => {
                apply_resize(state, cols, rows);
                surface.clear()?;
                state.damage.mark_full();
                engine.render(state, surface)?;
            }
            InputEvent::FocusGained => {
                state.focused = true;
                engine.render(state, surface)?;
            }
            InputEvent::FocusLost => {
                state.focused = false;
                engine.render(state, surface)?;
            }
        }
    }
}

fn configure_logging() -> Result<WorkerGuard> {
    let appender = tracing_appender::rolling::never(".", "ted.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_env("TED_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Ok(guard)
}

/// Leave the alternate screen before the default panic output so the
/// message lands on a readable terminal.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen,
            crossterm::cursor::Show
        );
        default_hook(info);
    }));
}

fn apply_resize(state: &mut EditorState, cols: u16, rows: u16) {
    let text_rows = (rows as usize).saturating_sub(STATUS_ROWS);
    state.view.resize(cols as usize, text_rows);
    info!(target: "runtime", cols, rows, "resize");
}

/// Map a surface cell to document coordinates. Clicks on the status line
/// return `None` and move nothing.
fn screen_to_document(state: &EditorState, column: u16, row: u16) -> Option<(usize, usize)> {
    let text_row = (row as usize).checked_sub(STATUS_ROWS)?;
    Some((
        state.view.origin_col + column as usize,
        state.view.origin_row + text_row,
    ))
}

const DIALOG_PROMPT: &str = "Text changed, save it?  [Y]es / [N]o / [C]ancel";

/// Modal quit confirmation drawn over the status line; the next frame
/// repaints it. Blocks on the surface until an answer key arrives.
struct SurfaceConfirm<'a> {
    surface: &'a mut CrosstermSurface,
    width: usize,
}

impl QuitConfirm for SurfaceConfirm<'_> {
    fn ask(&mut self) -> QuitChoice {
        match self.prompt() {
            Ok(choice) => choice,
            Err(err) => {
                // A dialog that cannot run must not lose the buffer.
                error!(target: "runtime", error = %err, "quit dialog failed");
                QuitChoice::Cancel
            }
        }
    }
}

impl SurfaceConfirm<'_> {
    fn prompt(&mut self) -> Result<QuitChoice> {
        let mut text = String::from(DIALOG_PROMPT);
        while text.chars().count() < self.width {
            text.push(' ');
        }
        self.surface.draw_text(0, 0, &text, CellStyle::Status)?;
        self.surface.flush()?;
        loop {
            if let InputEvent::Key(key) = self.surface.next_event()? {
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') => return Ok(QuitChoice::Yes),
                    KeyCode::Char('n') | KeyCode::Char('N') => return Ok(QuitChoice::No),
                    KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Esc => {
                        return Ok(QuitChoice::Cancel);
                    }
                    _ => {}
                }
            }
        }
    }
}
