mod backend;
mod config;
mod error;
mod ui;

use backend::updater::{update_comic_page, LoadedComic};
use backend::xkcd::{comic_page_url, XkcdClient};
use config::Config;
use error::PagerError;
use ui::ui::{App, InputMode, ui};

use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use log::{debug, info, warn};
use ratatui::{backend::CrosstermBackend, Terminal};
use ratatui_image::picker::Picker;
use std::{error::Error, fs, io, path::PathBuf, sync::Arc};
use tokio::sync::mpsc;

enum BackgroundTask {
    PageLoaded { request: u64, comics: Vec<LoadedComic> },
    PageFailed { request: u64, error: PagerError },
    Reveal { request: u64 },
}

/// Everything the event handlers need besides the app itself.
struct Context {
    config: Config,
    client: Arc<XkcdClient>,
    task_tx: mpsc::UnboundedSender<BackgroundTask>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let config = Config::load();
    let client = Arc::new(XkcdClient::new(&config)?);
    info!("starting against {}", config.api_base);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let picker = Picker::from_query_stdio().ok();
    let mut app = App::new(&config, picker);

    let (task_tx, mut task_rx) = mpsc::unbounded_channel::<BackgroundTask>();
    let ctx = Context {
        config,
        client,
        task_tx,
    };

    // First page
    start_update(&mut app, &ctx);

    let res = run_app(&mut terminal, &mut app, &ctx, &mut task_rx).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err}");
    }
    Ok(())
}

/// Logs go to a file: the terminal belongs to the UI.
fn init_logging() {
    let log_dir = dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("xkcd-pager");

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

    match fs::create_dir_all(&log_dir).and_then(|_| fs::File::create(log_dir.join("xkcd-pager.log"))) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn start_update(app: &mut App, ctx: &Context) {
    let request = app.begin_loading();
    let center = app.session.center;
    let count = app.session.count.value();
    let client = Arc::clone(&ctx.client);
    let tx = ctx.task_tx.clone();

    tokio::spawn(async move {
        let task = match update_comic_page(client.as_ref(), center, count).await {
            Ok(comics) => BackgroundTask::PageLoaded { request, comics },
            Err(error) => BackgroundTask::PageFailed { request, error },
        };
        let _ = tx.send(task);
    });
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ctx: &Context,
    task_rx: &mut mpsc::UnboundedReceiver<BackgroundTask>,
) -> io::Result<()> {
    let mut event_stream = EventStream::new();

    loop {
        terminal.draw(|f| ui(f, app))?;

        tokio::select! {
            // Tick so the spinner keeps moving
            _ = tokio::time::sleep(tokio::time::Duration::from_millis(100)) => {}

            Some(Ok(event)) = event_stream.next() => {
                if let Event::Key(key) = event
                    && key.kind == KeyEventKind::Press
                {
                    let quit = match app.input_mode {
                        InputMode::Browse => handle_browse_input(app, key.code, ctx),
                        InputMode::Search => {
                            handle_search_input(app, key.code, ctx);
                            false
                        }
                    };
                    if quit {
                        return Ok(());
                    }
                }
            }

            Some(task) = task_rx.recv() => {
                handle_task(app, task, ctx);
            }
        }
    }
}

fn handle_task(app: &mut App, task: BackgroundTask, ctx: &Context) {
    match task {
        BackgroundTask::PageLoaded { request, comics } => {
            if app.apply_page(request, comics) {
                app.reveal.schedule(
                    ctx.config.reveal_delay(),
                    ctx.task_tx.clone(),
                    BackgroundTask::Reveal { request },
                );
            } else {
                debug!(
                    "dropping stale page for request {request}, latest is {}",
                    app.requests.latest()
                );
            }
        }
        BackgroundTask::PageFailed { request, error } => {
            warn!("page update {request} failed: {error}");
            if !app.fail_page(request, &error) {
                debug!("dropping stale failure for request {request}");
            }
        }
        BackgroundTask::Reveal { request } => {
            app.reveal_page(request);
        }
    }
}

fn handle_browse_input(app: &mut App, key: KeyCode, ctx: &Context) -> bool {
    match key {
        KeyCode::Char('q') => return true,
        KeyCode::Left | KeyCode::Char('h') => {
            app.session.prev();
            start_update(app, ctx);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            app.session.next();
            start_update(app, ctx);
        }
        KeyCode::Char('r') => {
            app.session.random(&mut rand::thread_rng());
            start_update(app, ctx);
        }
        KeyCode::Char('d') => {
            let count = app.session.count.cycle();
            info!("display count changed to {}", count.value());
            app.change_display_count(count);
            start_update(app, ctx);
        }
        KeyCode::Char('R') => {
            if app.can_retry() {
                start_update(app, ctx);
            }
        }
        KeyCode::Char('/') => {
            app.input_mode = InputMode::Search;
        }
        KeyCode::Char('o') => {
            let url = comic_page_url(app.session.center);
            if let Err(e) = webbrowser::open(&url) {
                warn!("could not open {url}: {e}");
            }
        }
        _ => {}
    }
    false
}

fn handle_search_input(app: &mut App, key: KeyCode, ctx: &Context) {
    match key {
        KeyCode::Char(c) => {
            app.session.search_text.push(c);
        }
        KeyCode::Backspace => {
            app.session.search_text.pop();
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Browse;
        }
        KeyCode::Enter => match app.session.search() {
            Ok(()) => {
                app.input_mode = InputMode::Browse;
                start_update(app, ctx);
            }
            Err(e) => {
                debug!("rejected search: {e}");
                app.show_error(&e);
            }
        },
        _ => {}
    }
}
