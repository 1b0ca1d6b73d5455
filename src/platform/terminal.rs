//! Terminal frontend
//!
//! Each terminal cell stands for a block of virtual display pixels
//! (`terminal_cell_width` x `terminal_cell_height`). Frames are rasterized by
//! sampling cell centers and presented with diffed, synchronized updates.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use glam::{DVec2, IVec2};

use crate::app::App;
use crate::error::AppError;
use crate::renderer::frame::{Color, DrawCommand, Frame, arc_contains};
use crate::renderer::scene::draw_world;
use crate::settings::Settings;
use crate::sim::{Command, Display};

/// How long to wait for input before checking the timer
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One character cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: TermColor,
    pub bg: TermColor,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: TermColor::White,
            bg: TermColor::Black,
        }
    }
}

fn term_color(color: Color) -> TermColor {
    let [r, g, b, _] = color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    TermColor::Rgb { r, g, b }
}

/// Grid of cells a frame is rasterized into
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols as usize * rows as usize],
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn idx(&self, x: u16, y: u16) -> usize {
        y as usize * self.cols as usize + x as usize
    }

    pub fn cell(&self, x: u16, y: u16) -> Cell {
        self.cells[self.idx(x, y)]
    }

    fn fill_cell(&mut self, x: i64, y: i64, color: TermColor) {
        if x < 0 || y < 0 || x >= self.cols as i64 || y >= self.rows as i64 {
            return;
        }
        let i = self.idx(x as u16, y as u16);
        self.cells[i] = Cell {
            ch: ' ',
            fg: color,
            bg: color,
        };
    }

    /// Virtual display covered by this grid
    pub fn display(&self, cell_w: u16, cell_h: u16) -> Display {
        Display::new(
            self.cols as i32 * cell_w as i32,
            self.rows as i32 * cell_h as i32,
        )
    }

    /// Center of a cell in virtual pixels
    fn sample_point(x: u16, y: u16, cell_w: u16, cell_h: u16) -> DVec2 {
        DVec2::new(
            (x as f64 + 0.5) * cell_w as f64,
            (y as f64 + 0.5) * cell_h as f64,
        )
    }

    /// Rasterize every command of `frame`, in order
    pub fn paint(&mut self, frame: &Frame, cell_w: u16, cell_h: u16) {
        for command in frame.commands() {
            match *command {
                DrawCommand::ClearRect {
                    origin,
                    size,
                    color,
                } => {
                    let min = origin.as_dvec2();
                    let max = (origin + size).as_dvec2();
                    let inside = |p: DVec2| p.cmpge(min).all() && p.cmplt(max).all();
                    self.fill_where(cell_w, cell_h, inside, term_color(color));
                }
                DrawCommand::FillArc {
                    origin,
                    size,
                    start_angle,
                    arc_angle,
                    color,
                } => {
                    let inside = |p| arc_contains(origin, size, start_angle, arc_angle, p);
                    self.fill_where(cell_w, cell_h, inside, term_color(color));
                }
                DrawCommand::Line { from, to, color } => {
                    self.line(from, to, cell_w, cell_h, term_color(color));
                }
            }
        }
    }

    fn fill_where(
        &mut self,
        cell_w: u16,
        cell_h: u16,
        inside: impl Fn(DVec2) -> bool,
        color: TermColor,
    ) {
        for y in 0..self.rows {
            for x in 0..self.cols {
                if inside(Self::sample_point(x, y, cell_w, cell_h)) {
                    self.fill_cell(x as i64, y as i64, color);
                }
            }
        }
    }

    /// Walk the line in half-cell steps, filling every cell it passes through
    fn line(&mut self, from: IVec2, to: IVec2, cell_w: u16, cell_h: u16, color: TermColor) {
        let from = from.as_dvec2();
        let to = to.as_dvec2();
        let step = (cell_w.min(cell_h) as f64 / 2.0).max(0.5);
        let steps = ((to - from).length() / step).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let p = from.lerp(to, i as f64 / steps as f64);
            let x = (p.x / cell_w as f64).floor() as i64;
            let y = (p.y / cell_h as f64).floor() as i64;
            self.fill_cell(x, y, color);
        }
    }
}

/// Map a key press to a game command
pub fn key_command(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    match key.code {
        KeyCode::Left => Some(Command::TurnLeft),
        KeyCode::Right => Some(Command::TurnRight),
        KeyCode::Up => Some(Command::Forward),
        KeyCode::Down => Some(Command::Backward),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        _ => None,
    }
}

/// Raw-mode terminal session
pub struct Terminal {
    out: Stdout,
    prev: Canvas,
    cur: Canvas,
}

impl Terminal {
    pub fn begin() -> Result<Self, AppError> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            EnableFocusChange,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        let size = terminal::enable_raw_mode().and_then(|()| terminal::size());
        let (cols, rows) = match size {
            Ok(size) => size,
            Err(e) => {
                // Don't leave the user on the alternate screen
                let _ = restore(&mut out);
                return Err(e.into());
            }
        };
        Ok(Self {
            out,
            prev: Canvas::new(cols, rows),
            cur: Canvas::new(cols, rows),
        })
    }

    pub fn end(&mut self) -> Result<(), AppError> {
        restore(&mut self.out)?;
        Ok(())
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.cur
    }

    pub fn display(&self, cell_w: u16, cell_h: u16) -> Display {
        self.cur.display(cell_w, cell_h)
    }

    fn resize_if_needed(&mut self) -> Result<bool, AppError> {
        let (c, r) = terminal::size()?;
        if c == self.cur.cols && r == self.cur.rows {
            return Ok(false);
        }
        log::debug!("Terminal resized to {}x{}", c, r);
        self.prev = Canvas::new(c, r);
        self.cur = Canvas::new(c, r);
        queue!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    /// Write changed cells and flush
    fn present(&mut self) -> Result<(), AppError> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.cur.rows {
            for x in 0..self.cur.cols {
                let c = self.cur.cell(x, y);
                if c == self.prev.cell(x, y) {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        Ok(())
    }
}

fn restore(out: &mut impl Write) -> io::Result<()> {
    queue!(
        out,
        BeginSynchronizedUpdate,
        ResetColor,
        Clear(ClearType::All),
        cursor::Show,
        EnableLineWrap,
        DisableFocusChange,
        EndSynchronizedUpdate,
        LeaveAlternateScreen
    )?;
    out.flush()?;
    terminal::disable_raw_mode()
}

/// Put the terminal back before the default panic message prints
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore(&mut io::stdout());
        default_hook(info);
    }));
}

/// Terminal events the game loop cares about
enum Input {
    Key(KeyEvent),
    FocusGained,
    FocusLost,
}

fn collect_input(timeout: Duration) -> Result<Vec<Input>, AppError> {
    let mut out = Vec::new();
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(k) if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat => {
                out.push(Input::Key(k));
                if out.len() >= 32 {
                    break;
                }
            }
            Event::FocusGained => out.push(Input::FocusGained),
            Event::FocusLost => out.push(Input::FocusLost),
            _ => {}
        }
    }
    Ok(out)
}

/// Run the game in the terminal until the player quits
pub fn run(settings: Settings) -> Result<(), AppError> {
    install_panic_hook();
    let mut term = Terminal::begin()?;
    let result = play(&mut term, settings);
    settle(result, term.end())
}

/// The game's own error wins over a failed restore
fn settle(played: Result<(), AppError>, restored: Result<(), AppError>) -> Result<(), AppError> {
    played.and(restored)
}

fn play(term: &mut Terminal, settings: Settings) -> Result<(), AppError> {
    let (cell_w, cell_h) = (settings.terminal_cell_width, settings.terminal_cell_height);
    let mut app = App::init(settings);
    app.start(term.display(cell_w, cell_h));

    let mut last = Instant::now();
    let mut dirty = true;

    while !app.has_exited() {
        for input in collect_input(POLL_INTERVAL)? {
            match input {
                Input::Key(key) => {
                    if let Some(command) = key_command(key) {
                        app.handle_command(command);
                    }
                }
                Input::FocusLost => app.stop(),
                Input::FocusGained => {
                    app.start(term.display(cell_w, cell_h));
                    dirty = true;
                }
            }
            if app.has_exited() {
                break;
            }
        }

        if term.resize_if_needed()? {
            dirty = true;
        }

        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;
        if app.update(dt, term.display(cell_w, cell_h)) > 0 {
            dirty = true;
        }

        if !dirty {
            continue;
        }
        if let Some(session) = app.session() {
            let frame = draw_world(session.world(), app.settings());
            term.canvas_mut().paint(&frame, cell_w, cell_h);
            term.present()?;
            dirty = false;
        }
    }

    app.destroy();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::vertex::colors;
    use crate::sim::{GameWorld, WorldConfig};

    #[test]
    fn test_canvas_display_size() {
        let canvas = Canvas::new(80, 24);
        assert_eq!(canvas.display(8, 16), Display::new(640, 384));
    }

    #[test]
    fn test_paint_player_disc_and_line() {
        let mut canvas = Canvas::new(80, 24);
        let world = GameWorld::new(canvas.display(8, 16), WorldConfig::default());
        let frame = draw_world(&world, &Settings::default());
        canvas.paint(&frame, 8, 16);

        // Center is (320, 360): column 40, row 22
        assert_eq!(world.player().center(), IVec2::new(320, 360));
        let yellow = term_color(colors::YELLOW);
        let magenta = term_color(colors::MAGENTA);
        let black = term_color(colors::BLACK);

        // Disc edge cell, left of the line
        assert_eq!(canvas.cell(37, 22).bg, yellow);
        // The heading line runs straight up from the center
        assert_eq!(canvas.cell(40, 22).bg, magenta);
        assert_eq!(canvas.cell(40, 19).bg, magenta);
        // Far corner stays background
        assert_eq!(canvas.cell(0, 0).bg, black);
    }

    #[test]
    fn test_settle_keeps_game_error() {
        let played = Err(AppError::NoCanvas("game".into()));
        let restored = Err(AppError::Io(io::Error::other("restore")));
        assert!(matches!(settle(played, restored), Err(AppError::NoCanvas(_))));

        let restored = Err(AppError::Io(io::Error::other("restore")));
        assert!(matches!(settle(Ok(()), restored), Err(AppError::Io(_))));
        assert!(settle(Ok(()), Ok(())).is_ok());
    }

    #[test]
    fn test_key_mapping() {
        let key = |code| KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(key_command(key(KeyCode::Left)), Some(Command::TurnLeft));
        assert_eq!(key_command(key(KeyCode::Right)), Some(Command::TurnRight));
        assert_eq!(key_command(key(KeyCode::Up)), Some(Command::Forward));
        assert_eq!(key_command(key(KeyCode::Down)), Some(Command::Backward));
        assert_eq!(key_command(key(KeyCode::Char('Q'))), Some(Command::Quit));
        assert_eq!(key_command(key(KeyCode::Char('r'))), Some(Command::Restart));
        assert_eq!(key_command(key(KeyCode::Enter)), None);
        assert_eq!(
            key_command(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::Quit)
        );
    }
}
