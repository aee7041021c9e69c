//! livescroll-feed — a paginated, auto-refreshing post feed for the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ FetchOutcome ┌──────────┐  draw()  ┌──────────┐
//! │ fetch.rs │ ───────────► │  app.rs  │ ───────► │  ui.rs   │
//! │ (worker) │  (channel)   │ (state)  │          │ (render) │
//! └──────────┘ ◄─────────── └──────────┘          └──────────┘
//!              FetchRequest      ▲
//!                                │ handle_key_event()
//!                           ┌──────────┐
//!                           │ input.rs │
//!                           └──────────┘
//! ```
//!
//! * **`source/`** — the `FeedSource` trait, the `Post`/`Page` types and the
//!   HTTP implementation.
//! * **`feed`** — the presenter: items, cursor, and the paginate/refresh
//!   state machines.  Pure; it only describes the requests it wants.
//! * **`fetch`** — runs those requests on a worker pool.
//! * **`app`** — UI state around the presenter (selection, search prompt,
//!   periodic refresh, outbound request queue).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`main`** — wires everything together: parse args, set up logging and
//!   the terminal, and run the event loop.

mod app;
mod config;
mod error;
mod feed;
mod fetch;
mod input;
mod logging;
mod source;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, info, warn};

use app::App;
use config::Config;
use feed::Feed;
use fetch::Fetcher;
use source::{FeedSource, HttpSource, Page};

// ---------------------------------------------------------------------------
// Terminal ownership
// ---------------------------------------------------------------------------

/// The feed screen: raw mode plus the alternate screen for as long as this
/// value lives.  The log file keeps any restore failure, since stderr is not
/// readable while the screen is ours.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    fn draw(&mut self, app: &mut App) -> io::Result<()> {
        self.terminal.draw(|f| ui::draw(app, f))?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore_terminal(&mut io::stdout()) {
            warn!(error = %e, "could not restore terminal");
        }
        let _ = self.terminal.show_cursor();
    }
}

/// Leave the feed screen and hand the terminal back to the shell.
fn restore_terminal(out: &mut impl io::Write) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(out, LeaveAlternateScreen)
}

/// A panic inside the event loop would otherwise print onto the alternate
/// screen in raw mode and vanish.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal(&mut io::stdout());
        error!(%info, "feed client panicked");
        default_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let config = Config::from_args();

    let _log_guard = logging::init(&config.log_dir)
        .with_context(|| format!("cannot create log directory {}", config.log_dir.display()))?;
    info!(endpoint = %config.endpoint, query = ?config.query, "livescroll-feed starting");

    install_panic_hook();

    // -- seed state ----------------------------------------------------------
    let seed = match &config.seed {
        Some(path) => Some(Page::load(path).context("loading seed page")?),
        None => None,
    };
    let seeded = seed.is_some();
    let (seed_items, seed_cursor) = match seed {
        Some(page) => (Some(page.items), page.next),
        None => (None, None),
    };
    let feed = Feed::new(seed_items, seed_cursor, config.query.clone(), config.search_mode);

    // -- data source and background fetcher ----------------------------------
    let source: Arc<dyn FeedSource> = Arc::new(
        HttpSource::new(&config.endpoint, config.timeout).context("configuring feed endpoint")?,
    );
    let (fetcher, rx) = Fetcher::spawn(source).context("starting fetch workers")?;

    let mut app = App::new(feed, config.refresh_every);
    if seeded {
        app.status = format!("Showing {} seeded posts", app.feed.len());
    } else {
        // Nothing to show yet; load page one.
        app.refresh();
    }

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;

    // -- main event loop -----------------------------------------------------
    // Runs at ~10 fps (100 ms tick).  Each iteration:
    //   1. Fold finished fetches into the state.
    //   2. Tick timers and dispatch queued requests.
    //   3. Render the UI.
    //   4. Poll for keyboard input (non-blocking, up to tick_rate).
    let tick_rate = Duration::from_millis(100);

    loop {
        while let Ok(outcome) = rx.try_recv() {
            app.handle_outcome(outcome);
        }

        app.tick(Instant::now());
        for request in app.take_requests() {
            fetcher.dispatch(request);
        }

        guard.draw(&mut app)?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    info!("livescroll-feed exiting");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
