mod app;
mod event;
mod ui;

use std::fs;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing_subscriber::EnvFilter;

use returnsleuth::config::Config;
use returnsleuth::engine::game::Cue;
use returnsleuth::generator::batch::BatchGenerator;
use returnsleuth::generator::remote::credential_from_env;
use returnsleuth::session::decision::Action;
use returnsleuth::session::powerup::PowerUpKind;
use returnsleuth::session::state::Phase;

use app::{App, AppScreen};
use event::{AppEvent, EventHandler};
use ui::components::details::{ItemDetails, label_line};
use ui::components::item_card::ItemCard;
use ui::components::menu::Menu;
use ui::components::progress_bar::TimeBar;
use ui::components::summary::SummaryPanel;
use ui::layout::{GameLayout, centered_rect};
use ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "returnsleuth",
    version,
    about = "Spot the flawed returns before the clock runs out"
)]
struct Cli {
    #[arg(short, long, help = "Level to start at")]
    level: Option<u32>,

    #[arg(long, help = "Only use the built-in item catalog")]
    offline: bool,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging() -> Result<()> {
    let Some(dir) = dirs::data_dir().map(|d| d.join("returnsleuth")) else {
        return Ok(());
    };
    fs::create_dir_all(&dir)?;
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("returnsleuth.log"))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("returnsleuth=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(err) = init_logging() {
        eprintln!("warning: logging disabled: {err}");
    }

    let config_path = Config::config_path();
    if !config_path.exists() {
        if let Err(err) = Config::default().save_to(&config_path) {
            tracing::warn!("could not write default config: {err:#}");
        }
    }

    let mut config = Config::load().unwrap_or_else(|err| {
        tracing::warn!("failed to load config, using defaults: {err:#}");
        Config::default()
    });
    if let Some(level) = cli.level {
        config.start_level = level;
    }
    if cli.offline {
        config.remote_enabled = false;
    }
    config.normalize();

    let theme_name = cli.theme.unwrap_or_else(|| config.theme.clone());
    let theme = Theme::load(&theme_name).unwrap_or_default();

    let source = config.content_source(credential_from_env());
    let generator = Arc::new(BatchGenerator::new(
        SmallRng::from_entropy(),
        source,
        config.rules().remote_timeout,
    ));
    tracing::info!(
        online = generator.has_remote(),
        level = config.start_level,
        "starting"
    );

    let mut app = App::new(config, theme, generator);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!("{err:#}");
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick(now) => app.on_tick(now),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Game => match app.phase() {
            Some(Phase::Summary) => handle_summary_key(app, key),
            Some(_) => handle_game_key(app, key),
            None => app.go_to_menu(),
        },
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter | KeyCode::Char(' ') => app.start_game(),
        _ => {}
    }
}

fn handle_game_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Char('a') | KeyCode::Left => app.decide(Action::Accept),
        KeyCode::Char('d') | KeyCode::Right => app.decide(Action::Reject),
        KeyCode::Char('1') => app.power_up(PowerUpKind::Reveal),
        KeyCode::Char('2') => app.power_up(PowerUpKind::TimeExtension),
        KeyCode::Char('i') | KeyCode::Char(' ') => app.inspect(),
        _ => {}
    }
}

fn handle_summary_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        KeyCode::Char('n') | KeyCode::Enter => app.advance(),
        KeyCode::Char('r') => app.retry(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Game => render_game(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let menu = Menu::new(app.config.level_seconds, app.is_online(), &app.theme);
    frame.render_widget(&menu, centered_rect(60, 60, frame.area()));
}

fn cue_label(cue: Cue) -> &'static str {
    match cue {
        Cue::Success => "nice catch",
        Cue::Failure => "missed",
        Cue::Combo => "COMBO!",
        Cue::Timeout => "time's up",
        Cue::PowerUp => "power-up",
        Cue::Scan => "scanning",
    }
}

fn render_game(frame: &mut ratatui::Frame, app: &App) {
    let Some(game) = app.game.as_ref() else {
        return;
    };
    let colors = &app.theme.colors;
    let snap = game.snapshot();
    let layout = GameLayout::new(frame.area());

    let mut header = vec![
        Span::styled(
            format!(" Level {} ", snap.level),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  Score {}  Streak {}  ", snap.score, snap.streak),
            Style::default().fg(colors.fg()),
        ),
        Span::styled(
            format!("Correct {}  Missed {}", snap.correct, snap.mistakes),
            Style::default().fg(colors.muted()),
        ),
    ];
    if let Some(cue) = app.last_cue {
        header.push(Span::styled(
            format!("  {}", cue_label(cue)),
            Style::default().fg(colors.accent()),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(header)), layout.header);

    frame.render_widget(
        TimeBar::new(snap.time_remaining, game.rules().level_seconds, &app.theme),
        layout.timer,
    );

    if let Some(summary) = snap.summary {
        let area = centered_rect(70, 80, layout.card.union(layout.sidebar.unwrap_or(layout.card)));
        frame.render_widget(SummaryPanel::new(summary, &app.theme), area);
    } else {
        let item = if snap.loading { None } else { snap.item };
        let mut card = layout.card;
        if let (None, Some(shown)) = (layout.sidebar, item) {
            // No sidebar: the tag text gets the card's last row.
            card.height = card.height.saturating_sub(1);
            let row = Rect::new(card.x, card.y + card.height, card.width, 1);
            frame.render_widget(
                Paragraph::new(label_line(shown, snap.details_open, &app.theme)),
                row,
            );
        }
        frame.render_widget(
            ItemCard::new(item, &app.noise, snap.feedback, snap.revealed_fraud, &app.theme),
            card,
        );
        if let Some(sidebar) = layout.sidebar {
            frame.render_widget(
                ItemDetails::new(
                    item,
                    snap.details_open,
                    snap.reveal_uses,
                    snap.time_extension_uses,
                    &app.theme,
                ),
                sidebar,
            );
        }
    }

    let hints = match snap.phase {
        Phase::Summary if snap.can_advance => " Level cleared!",
        Phase::Summary => " Not quite. Fewer mistakes than catches and a positive score to pass.",
        _ => " [a] Accept  [d] Reject  [i] Inspect  [1] X-ray  [2] Time  [Esc] Menu",
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(colors.muted()),
        ))),
        layout.footer,
    );
}
