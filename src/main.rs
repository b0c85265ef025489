use std::io::{self, IsTerminal, Read};
use std::process;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::prelude::*;

use pretty_table_pager::app::App;
use pretty_table_pager::config::Cli;
use pretty_table_pager::db::{self, PgSource};
use pretty_table_pager::notify::Notifier;
use pretty_table_pager::parser;
use pretty_table_pager::render;
use pretty_table_pager::source::MemorySource;
use pretty_table_pager::streaming::StreamingLoader;

/// Initialize the terminal for TUI rendering.
/// Enables raw mode, enters alternate screen, and creates a Terminal instance.
fn init_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

/// Restore the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Print an error and exit before the TUI starts.
fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

/// Build the app for the selected input.
fn build_app(cli: &Cli) -> io::Result<App> {
    let notifier = Notifier::new();

    if let (Some(conn), Some(table)) = (&cli.connect, &cli.table) {
        let client = db::connect(conn).unwrap_or_else(|e| fail(format!("Failed to connect: {}", e)));
        let source = PgSource::new(client, table).unwrap_or_else(|e| fail(e));
        info!("paging table {} from the database", table);
        return App::remote(Box::new(source), cli.page_size, notifier).map_err(io::Error::other);
    }

    if io::stdin().is_terminal() {
        eprintln!("Usage: psql -c 'SELECT ...' | ptp");
        eprintln!("       ptp --connect <CONN> --table <NAME>");
        process::exit(1);
    }

    if cli.server_side {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        let data = parser::parse_psql(&input)
            .unwrap_or_else(|| fail("Invalid or empty input. Expected psql table format."));
        info!("paging {} piped rows server-side", data.row_count());
        let source = MemorySource::new("stdin", data);
        return App::remote(Box::new(source), cli.page_size, notifier).map_err(io::Error::other);
    }

    let loader = StreamingLoader::from_stdin()?
        .unwrap_or_else(|| fail("Invalid or empty input. Expected psql table format."));
    App::streaming("stdin", loader, cli.page_size, notifier).map_err(io::Error::other)
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    if let Err(e) = cli.validate() {
        fail(e);
    }
    if let Err(e) = cli.init_logging() {
        fail(e);
    }

    let mut app = build_app(&cli)?;

    // Set up panic hook to restore terminal on crash
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut terminal = init_terminal()?;

    let result = run(&mut terminal, &mut app);

    terminal.clear()?;
    restore_terminal(&mut terminal)?;
    if let Err(ref e) = result {
        error!("terminal error: {}", e);
    }
    app.shutdown();
    result
}

/// Main event loop.
fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|frame| render::draw(frame, app))?;

        // The loading state is on screen; now fetch
        if app.has_pending_fetch() {
            app.run_pending_fetch();
            continue;
        }

        // Poll with 100ms timeout so streamed rows and toasts stay current
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(&key);
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}
