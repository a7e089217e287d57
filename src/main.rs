// src/main.rs
use std::{
    fs::{self, OpenOptions},
    io::{self, BufRead, IsTerminal, Write},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use anyhow::{Result, anyhow};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing_subscriber::EnvFilter;

mod app;
mod clipboard;
mod config;
mod error;
mod input;
mod models;
mod network;
mod prompts;
mod theme;
mod ui;

use crate::app::{App, GenerationResult, spawn_generation};
use crate::clipboard::SystemClipboard;
use crate::config::Settings;
use crate::input::{KeyOutcome, handle_key};
use crate::models::format_hashtags;
use crate::network::{GeminiClient, HashtagService};
use crate::theme::ThemeMode;

#[derive(Parser, Debug)]
#[command(name = "hashtagger", version, about = "Generate categorized hashtags for a topic with Gemini")]
struct Cli {
    /// Topic to generate hashtags for; submitted right away
    topic: Vec<String>,

    /// Gemini model to use instead of the configured one
    #[arg(short, long)]
    model: Option<String>,

    /// Generate once, print the result and exit
    #[arg(short, long)]
    print: bool,

    /// Start with the light theme
    #[arg(long)]
    light: bool,

    /// Extra config file merged over the others
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = init_logging();

    let mut settings = Settings::new(cli.config.as_deref())?;
    if let Some(model) = cli.model.clone() {
        settings.gemini_model = model;
    }
    tracing::info!(model = %settings.gemini_model, log = ?log_path, "starting hashtagger");

    if settings.api_key().is_none() && settings.prompt_for_api_key && io::stdin().is_terminal() {
        if let Some(key) = prompt_api_key()? {
            settings.gemini_api_key = Some(key);
        }
    }

    let service: Arc<dyn HashtagService> = Arc::new(GeminiClient::from_settings(&settings)?);
    let topic = cli.topic.join(" ");

    if cli.print {
        return print_once(service, &topic);
    }

    let theme = if cli.light { ThemeMode::Light } else { ThemeMode::Dark };
    let mut app = App::new(theme);
    app.topic = topic;
    run_tui(&mut app, service)
}

/// Used when `RUST_LOG` is unset. Not scoped to a crate name: the `htag`
/// binary's targets start with `htag::`.
const DEFAULT_LOG_FILTER: &str = "info";

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Logs go to a file; stdout belongs to the terminal UI.
fn init_logging() -> Option<PathBuf> {
    let dir = dirs::data_local_dir()?.join("hashtagger");
    fs::create_dir_all(&dir).ok()?;
    let path = dir.join("hashtagger.log");
    let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Some(path)
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_api_key() -> Result<Option<String>> {
    println!("No Gemini API key found (config gemini_api_key, GEMINI_API_KEY or API_KEY).");
    let key = read_line("Enter your Gemini API key (leave empty to skip): ")?;

    if key.is_empty() {
        let answer = read_line("Don't ask again? [y/N]: ")?;
        if answer.eq_ignore_ascii_case("y") {
            config::disable_api_key_prompt()?;
        }
        return Ok(None);
    }

    let answer = read_line("Save key to ~/.config/hashtagger/hashtagger.toml? [y/N]: ")?;
    if answer.eq_ignore_ascii_case("y") {
        config::save_api_key(&key)?;
        println!("Saved.");
    }
    Ok(Some(key))
}

fn print_once(service: Arc<dyn HashtagService>, topic: &str) -> Result<()> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(anyhow!("--print needs a topic"));
    }

    let rt = Runtime::new()?;
    let hashtags = rt
        .block_on(service.generate(topic))
        .map_err(|e| anyhow!(e.user_message()))?;

    let mut out = io::stdout().lock();
    for category in hashtags.categories() {
        writeln!(out, "{}: {}", ui::capitalize(&category.name), format_hashtags(&category.tags))?;
    }
    let all: Vec<&String> = hashtags.categories().iter().flat_map(|c| c.tags.iter()).collect();
    writeln!(out)?;
    writeln!(out, "{}", format_hashtags(all))?;
    Ok(())
}

fn restore_terminal() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn run_tui(app: &mut App, service: Arc<dyn HashtagService>) -> Result<()> {
    let rt = Runtime::new()?;
    let (tx, rx) = unbounded_channel::<GenerationResult>();

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();
        default_hook(info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    if let Some(topic) = app.submit() {
        spawn_generation(rt.handle(), service.clone(), topic, tx.clone());
    }

    let result = event_loop(&mut terminal, app, &rt, service, tx, rx);

    restore_terminal();
    terminal.show_cursor()?;
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rt: &Runtime,
    service: Arc<dyn HashtagService>,
    tx: UnboundedSender<GenerationResult>,
    mut rx: UnboundedReceiver<GenerationResult>,
) -> Result<()> {
    let mut clipboard = SystemClipboard::default();

    loop {
        while let Ok(result) = rx.try_recv() {
            app.finish_generation(result);
        }
        app.tick(Instant::now());

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                match handle_key(app, key_event, &mut clipboard, Instant::now()) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Generate(topic) => {
                        spawn_generation(rt.handle(), service.clone(), topic, tx.clone());
                    }
                    KeyOutcome::Quit => break,
                }
            }
        }
    }

    tracing::info!("shutting down");
    Ok(())
}
