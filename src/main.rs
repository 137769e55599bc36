//! backoffice - admin console
//!
//! Terminal front end for creating products and accounts against the
//! shop API. Configuration comes from the environment (and `.env`).

use std::io;
use std::rc::Rc;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use backoffice::application::{App, AppMode};
use backoffice::infrastructure::{init_tracing, ApiClient, ClientConfig, FileTokenStore, SessionContext};
use backoffice::presentation::{render_ui, InputHandler};

/// Entry point for the backoffice console.
///
/// Loads configuration, sets up logging and the API client, then runs
/// the terminal UI until the user quits.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = ClientConfig::from_env()?;
    init_tracing(&config.log_file)?;
    tracing::info!(base_url = %config.base_url, "starting backoffice console");

    let session = Rc::new(SessionContext::new(
        FileTokenStore::new(&config.token_file),
        config.login_path.clone(),
    ));
    let client = ApiClient::new(&config, session)?;
    let mut app = App::new(client);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %err, "terminal error");
        println!("{err:?}");
    }

    Ok(())
}

/// Main event loop: draw, read a key, dispatch it. Returns on 'q' in normal mode.
fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                match key.code {
                    KeyCode::Char('q') if matches!(app.mode, AppMode::Normal) => return Ok(()),
                    _ => InputHandler::handle_key_event(app, key.code, key.modifiers),
                }
            }
        }
    }
}
