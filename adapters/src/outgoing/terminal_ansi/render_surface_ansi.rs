use std::io::{self, Stdout, Write};
use tracing::warn;

use domain::{color::Color, grid::PixelGrid, playback::PlaybackState};
use framepack_application::{
    error::{AppError, AppResult},
    ports::outgoing::render_surface::RenderSurfacePort,
};

const CLEAR_SCREEN: &str = "\x1b[2J";
const CURSOR_HOME: &str = "\x1b[H";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";
const RESET: &str = "\x1b[0m";
const UPPER_HALF_BLOCK: char = '\u{2580}';

pub struct AnsiTerminalSurface<W: Write + Send> {
    out: W,
    started: bool,
    buffer: Vec<u8>,
}

impl AnsiTerminalSurface<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> AnsiTerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            started: false,
            buffer: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn compose_frame(&mut self, frame: &PixelGrid, state: &PlaybackState) -> io::Result<()> {
        let buf = &mut self.buffer;
        buf.clear();
        if !self.started {
            write!(buf, "{CLEAR_SCREEN}{HIDE_CURSOR}")?;
        }
        write!(buf, "{CURSOR_HOME}")?;

        for y in (0..frame.height()).step_by(2) {
            let upper = frame.row(y).unwrap_or_default();
            let lower = frame.row(y + 1);
            for (x, top) in upper.iter().enumerate() {
                let [r, g, b] = top.to_rgb8();
                write!(buf, "\x1b[38;2;{r};{g};{b}m")?;
                match lower.and_then(|row| row.get(x)).map(Color::to_rgb8) {
                    Some([r, g, b]) => write!(buf, "\x1b[48;2;{r};{g};{b}m")?,
                    None => write!(buf, "\x1b[49m")?,
                }
                write!(buf, "{UPPER_HALF_BLOCK}")?;
            }
            writeln!(buf, "{RESET}")?;
        }

        write!(
            buf,
            "frame {}/{}  {} fps{}\x1b[K",
            state.current_frame() + 1,
            state.total_frames(),
            state.fps(),
            if state.is_playing() { "" } else { "  [paused]" }
        )?;
        Ok(())
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        self.out.write_all(&self.buffer)?;
        self.out.flush()?;
        self.started = true;
        Ok(())
    }
}

fn render_error(e: &io::Error) -> AppError {
    AppError::RenderError {
        message: format!("Failed to write to terminal: {e}"),
    }
}

impl<W: Write + Send> RenderSurfacePort for AnsiTerminalSurface<W> {
    fn render(&mut self, frame: &PixelGrid, state: &PlaybackState) -> AppResult<()> {
        self.compose_frame(frame, state)
            .and_then(|()| self.flush_buffer())
            .map_err(|e| render_error(&e))
    }

    fn render_error(&mut self, message: &str) -> AppResult<()> {
        writeln!(self.out, "\x1b[31m{message}{RESET}")
            .and_then(|()| self.out.flush())
            .map_err(|e| render_error(&e))
    }
}

impl<W: Write + Send> Drop for AnsiTerminalSurface<W> {
    fn drop(&mut self) {
        if !self.started {
            return;
        }
        if let Err(e) = writeln!(self.out, "{RESET}{SHOW_CURSOR}").and_then(|()| self.out.flush()) {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}
