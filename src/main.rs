mod app;
mod cli;
mod columns;
mod config;
mod input;
mod model;
mod resources;
mod session;
mod ui;
mod views;
mod widgets;

use anyhow::{Context, Result, anyhow};
use app::App;
use clap::Parser;
use cli::CliArgs;
use columns::ColumnStore;
use config::PodjiConfig;
use crossterm::event::{
    Event as TermEvent, EventStream, KeyEventKind, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use futures::StreamExt;
use input::{Event, Key, Msg};
use model::NamespaceScope;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use resources::Registry;
use session::Session;
use std::fs::File;
use std::io::{self, Stdout};
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use views::Effect;

type TuiTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> ExitCode {
    match try_main().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("podji: {error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn try_main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args.log_filter, args.log_file.as_deref())?;

    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let config = PodjiConfig::load(args.config.as_deref(), &cwd)?.merge_args(&args);
    let mut app = build_app(&config)?;

    if args.all_namespaces && args.namespace.is_some() {
        warn!("both --all-namespaces and --namespace were provided, using all namespaces");
    }

    run(&mut app).await
}

fn init_tracing(level_filter: &str, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_new(level_filter)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to initialize tracing filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        None => {
            let _ = builder.with_writer(io::sink).try_init();
        }
    }

    Ok(())
}

fn build_app(config: &PodjiConfig) -> Result<App> {
    let registry = Arc::new(Registry::stub());
    let columns = Arc::new(ColumnStore::new());
    config.seed_columns(&columns);

    let mut session = Session::new(registry.clone(), columns);
    if let Some(namespace) = &config.namespace {
        session = session.with_namespace(NamespaceScope::parse(namespace));
    }
    if let Some(context) = &config.context {
        if !registry.contexts().contains(context) {
            warn!(context, "context not in the known list");
        }
        session = session.with_context(context.clone());
    }
    let kind = match &config.kind {
        Some(token) => registry
            .resolve(token)
            .ok_or_else(|| anyhow!("unknown resource kind {token:?}"))?,
        None => registry.primary(),
    };
    info!(
        kind = kind.name(),
        namespace = %session.namespace,
        context = %session.context,
        "starting"
    );
    Ok(App::with_kind(session, kind))
}

async fn run(app: &mut App) -> Result<()> {
    let (mut terminal, keyboard_enhanced) = init_terminal()?;
    let run_result = run_loop(&mut terminal, app).await;
    let restore_result = restore_terminal(&mut terminal, keyboard_enhanced);

    match (run_result, restore_result) {
        (Err(run_error), Err(restore_error)) => Err(anyhow!(
            "{run_error:#}\nterminal restore error: {restore_error:#}"
        )),
        (Err(error), _) => Err(error),
        (_, Err(error)) => Err(error),
        (Ok(()), Ok(())) => Ok(()),
    }
}

fn init_terminal() -> Result<(TuiTerminal, bool)> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true));
    if keyboard_enhanced {
        execute!(
            stdout,
            EnterAlternateScreen,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )
        .context("failed to enter alternate screen with keyboard enhancement")?;
    } else {
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal backend")?;
    terminal.clear().context("failed to clear terminal")?;
    Ok((terminal, keyboard_enhanced))
}

fn restore_terminal(terminal: &mut TuiTerminal, keyboard_enhanced: bool) -> Result<()> {
    if keyboard_enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)
            .context("failed to pop keyboard enhancement flags")?;
    }
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

async fn run_loop(terminal: &mut TuiTerminal, app: &mut App) -> Result<()> {
    let size = terminal.size().context("failed to read terminal size")?;
    app.handle_event(Event::Resize {
        width: size.width,
        height: size.height,
    });

    let mut reader = EventStream::new();
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Msg>();

    loop {
        terminal
            .draw(|frame| ui::render(frame, app))
            .context("failed to render terminal frame")?;

        let event = tokio::select! {
            maybe_event = reader.next() => match maybe_event {
                Some(Ok(TermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                    match Key::from_event(key) {
                        Some(key) => Event::Key(key),
                        None => continue,
                    }
                }
                Some(Ok(TermEvent::Resize(width, height))) => Event::Resize { width, height },
                Some(Ok(_)) => continue,
                Some(Err(error)) => return Err(error).context("terminal event error"),
                None => {
                    warn!("terminal event stream closed");
                    break;
                }
            },
            Some(msg) = msg_rx.recv() => Event::Msg(msg),
        };

        match app.handle_event(event) {
            None => {}
            Some(Effect::Quit) => break,
            Some(Effect::Emit(msg)) => {
                if msg_tx.send(msg).is_err() {
                    warn!("message channel closed");
                }
            }
            Some(Effect::After { delay, msg }) => {
                debug!(?delay, ?msg, "scheduling delayed message");
                let tx = msg_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(msg);
                });
            }
        }
    }

    Ok(())
}
