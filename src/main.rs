mod app;
mod config;
mod pricing;
mod slider;
mod store;
mod theme;
mod ui;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        KeyCode, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::fs::File;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::{App, Popup, StartOptions};
use config::AppConfig;
use pricing::{Billing, TIERS};
use store::{KeyValueStore, MemoryStore, TomlStore};
use theme::ThemeMode;

const LOG_FILE: &str = "tierslide.log";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ThemeMode {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => ThemeMode::Light,
            ThemeArg::Dark => ThemeMode::Dark,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tierslide")]
#[command(version)]
#[command(about = "Traffic-based pricing card for the terminal")]
struct Args {
    /// Starting tier, 1 (10K pageviews) to 5 (1M pageviews)
    #[arg(short, long)]
    tier: Option<usize>,

    /// Start with yearly billing
    #[arg(short, long)]
    yearly: bool,

    /// Use this theme and remember it
    #[arg(long, value_enum)]
    theme: Option<ThemeArg>,

    /// Print the selected quote as JSON and exit
    #[arg(short, long)]
    quote: bool,
}

impl Args {
    fn start_options(&self) -> StartOptions {
        StartOptions {
            tier: self.tier.map(|t| t.clamp(1, TIERS.len()) - 1),
            billing: self.yearly.then_some(Billing::Yearly),
            theme: self.theme.map(ThemeMode::from),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Kept alive until exit so buffered log lines are flushed
    let _log_guard = init_logging();

    let args = Args::parse();
    let config = AppConfig::load().unwrap_or_default();
    let store = open_store();
    let options = args.start_options();
    let mut app = App::new(&config, store, options)?;

    // Handle CLI-only commands
    if args.quote {
        return print_quote(&app);
    }

    // An explicit --theme is remembered like a toggle would be
    if options.theme.is_some() {
        if let Err(e) = app.save_theme() {
            tracing::warn!("Failed to save theme: {}", e);
        }
    }

    run_tui(app).await
}

/// Log to `<config_dir>/tierslide/tierslide.log`, filtered by `RUST_LOG`.
///
/// The terminal belongs to the TUI, so without a config directory nothing is
/// logged at all.
fn init_logging() -> Option<WorkerGuard> {
    let file = open_log_file(&config::config_dir()?)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    Some(guard)
}

/// Fresh log file for this run in `dir`
fn open_log_file(dir: &Path) -> Option<File> {
    std::fs::create_dir_all(dir).ok()?;
    File::create(dir.join(LOG_FILE)).ok()
}

fn open_store() -> Box<dyn KeyValueStore> {
    match TomlStore::open_default() {
        Ok(store) => {
            tracing::debug!("preferences at {}", store.path().display());
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!("Preferences will not be saved: {}", e);
            Box::new(MemoryStore::new())
        }
    }
}

fn print_quote(app: &App) -> Result<()> {
    let quote = app.quote();
    let output = serde_json::json!({
        "text": format!("{} {}", quote.display_price, quote.period_label()),
        "tooltip": format!("{} pageviews", quote.pageviews),
        "quote": quote,
        "theme": app.theme.as_str(),
    });

    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

async fn run_tui(mut app: App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            let outcome = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') if app.popup == Popup::None => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => app.handle_key(key),
                },
                Event::Mouse(mouse) => {
                    let size = terminal.size()?;
                    app.handle_mouse(mouse, Rect::new(0, 0, size.width, size.height))
                }
                Event::FocusLost => {
                    app.handle_focus_lost();
                    Ok(())
                }
                Event::Resize(_, _) => {
                    app.handle_resize();
                    Ok(())
                }
                _ => Ok(()),
            };

            // Show errors instead of crashing
            if let Err(e) = outcome {
                tracing::warn!("{:#}", e);
                app.set_status(format!("Error: {}", e));
            }
        }

        app.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_tier_is_one_based_and_clamped() {
        let args = Args::parse_from(["tierslide", "--tier", "1"]);
        assert_eq!(args.start_options().tier, Some(0));

        let args = Args::parse_from(["tierslide", "-t", "12", "--yearly", "--theme", "dark"]);
        let options = args.start_options();
        assert_eq!(options.tier, Some(4));
        assert_eq!(options.billing, Some(Billing::Yearly));
        assert_eq!(options.theme, Some(ThemeMode::Dark));

        let args = Args::parse_from(["tierslide"]);
        let options = args.start_options();
        assert_eq!(options.tier, None);
        assert_eq!(options.billing, None);
    }

    #[test]
    fn test_log_file_lives_in_config_dir() {
        let dir = std::env::temp_dir().join(format!("tierslide-test-{}-log", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        assert!(open_log_file(&dir).is_some());
        assert!(dir.join(LOG_FILE).is_file());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
