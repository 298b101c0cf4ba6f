use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Stylize},
    text::Line,
};
use starfall_background::{CellCanvas, Starfield};
use starfall_config::Config;
use tracing::info;

mod cli;
mod host;
mod logging;

use cli::Cli;
use host::TerminalHost;

/// Accent color for the key hints.
const HINT_COLOR: Color = Color::Rgb(216, 180, 254);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref(), cli.verbose)?;

    let config_path = cli.config_path()?;
    let config = cli.apply(Config::load_from(&config_path)?);

    if cli.write_config {
        config.save_to(&config_path)?;
        println!("Wrote {}", config_path.display());
        return Ok(());
    }

    info!(config = %config_path.display(), seed = ?cli.seed, "starting starfall");

    let terminal = ratatui::init();
    let result = App::new(config, cli.seed).run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Effective configuration.
    config: Config,
    /// Fixed seed for the random source, if any.
    seed: Option<u64>,
    /// Cell surface the starfield draws on.
    canvas: CellCanvas,
    /// Show the key hints on the bottom row.
    show_help: bool,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config, seed: Option<u64>) -> Self {
        let display = config.display;
        let canvas = CellCanvas::new(0, 0, display.cell_width_px, display.cell_height_px)
            .with_opacity(display.opacity)
            .with_backdrop(display.backdrop);
        Self {
            running: false,
            config,
            seed,
            canvas,
            show_help: display.show_help,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let area = terminal.size()?;
        self.canvas.resize(area.width, area.height);

        let mut host = TerminalHost::new(
            self.canvas.pixel_size(),
            self.config.display.frame_interval(),
        );
        let rng = self
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let mut starfield = Starfield::mount_with_rng(self.config.animation, rng, &mut host);

        self.running = true;
        let result = self.event_loop(&mut terminal, &mut host, &mut starfield);

        starfield.unmount(&mut host);
        let stats = host.stats();
        info!(
            frames = stats.frames_delivered,
            resizes = stats.resizes_delivered,
            "starfall stopped"
        );
        result
    }

    fn event_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        host: &mut TerminalHost,
        starfield: &mut Starfield,
    ) -> color_eyre::Result<()> {
        while self.running {
            host.tick();
            for timer in host.take_due_timers() {
                starfield.on_timer(timer);
            }
            if let Some(handle) = host.take_due_frame() {
                terminal.draw(|frame| {
                    starfield.on_frame(handle, &mut self.canvas, &mut *host);
                    frame.render_widget(&self.canvas, frame.area());
                    if self.show_help {
                        render_help(frame);
                    }
                })?;
            }
            self.handle_crossterm_events(host, starfield)?;
        }
        Ok(())
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits no longer than the next scheduled frame or timer.
    fn handle_crossterm_events(
        &mut self,
        host: &mut TerminalHost,
        starfield: &mut Starfield,
    ) -> color_eyre::Result<()> {
        if event::poll(host.poll_timeout())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(columns, rows) => self.on_resize(columns, rows, host, starfield),
                // The background never takes pointer input.
                Event::Mouse(_) => {}
                _ => {}
            }
        }
        Ok(())
    }

    /// Resize the canvas and tell the starfield about the new pixel size.
    fn on_resize(
        &mut self,
        columns: u16,
        rows: u16,
        host: &mut TerminalHost,
        starfield: &mut Starfield,
    ) {
        self.canvas.resize(columns, rows);
        let size = self.canvas.pixel_size();
        if host.resize(size) {
            starfield.on_resize(size);
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('h')) => self.show_help = !self.show_help,
            _ => {}
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

/// Key hints on the bottom row, drawn over the background.
fn render_help(frame: &mut Frame) {
    let [_, bottom] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());
    let help = Line::from(vec![
        "q".bold().fg(HINT_COLOR),
        " quit  ".dark_gray(),
        "h".bold().fg(HINT_COLOR),
        " toggle help".dark_gray(),
    ])
    .centered();
    frame.render_widget(help, bottom);
}
