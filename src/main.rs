use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{error, info, warn};

use otiyot::app::{App, AppScreen};
use otiyot::config::Config;
use otiyot::data;
use otiyot::event::{AppEvent, EventHandler};
use otiyot::keyboard::finger;
use otiyot::logging::{self, LogTarget};
use otiyot::session::catalog::ExerciseCatalog;
use otiyot::speech::process::ProcessBackend;
use otiyot::speech::store::DirClipStore;
use otiyot::speech::{ClipStore, SpeechOrchestrator, SpeechSource, SpeechSpeed, clip_path};
use otiyot::store::json_store::JsonStore;
use otiyot::ui::components::exercise_list::ExerciseList;
use otiyot::ui::components::keyboard_diagram::KeyboardDiagram;
use otiyot::ui::components::progress_bar::ProgressBar;
use otiyot::ui::components::result_panel::ResultPanel;
use otiyot::ui::components::typing_area::TypingArea;
use otiyot::ui::layout::{AppLayout, centered_rect, pack_hint_lines};

#[derive(Parser)]
#[command(name = "otiyot", version, about = "Hebrew typing tutor")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Translate Latin keys through the Hebrew layout")]
    qwerty: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print every exercise in the catalog
    List,
    /// Print one exercise's text
    Show {
        id: String,
        #[arg(long, help = "Seed for generated text")]
        seed: Option<u64>,
    },
    /// Voice a vocabulary or phrase item
    Speak {
        item_id: String,
        #[arg(long, help = "Text to synthesize if no clip exists")]
        text: Option<String>,
        #[arg(long)]
        slow: bool,
    },
    /// Check which items have a pre-rendered clip
    AudioReport,
    /// Print vocabulary categories, or the items of one category
    Vocab {
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let target = if cli.command.is_some() {
        LogTarget::Stderr
    } else {
        LogTarget::File(logging::default_log_file())
    };
    logging::init(target)?;

    let mut config = Config::load().unwrap_or_else(|err| {
        error!(error = %err, "failed to load config, using defaults");
        Config::default()
    });
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.qwerty {
        config.keyboard_input = otiyot::config::KeyboardInput::Qwerty;
    }

    match cli.command {
        Some(Command::List) => list_exercises(),
        Some(Command::Show { id, seed }) => show_exercise(&id, seed),
        Some(Command::Speak {
            item_id,
            text,
            slow,
        }) => speak_item(&config, &item_id, text, slow),
        Some(Command::AudioReport) => audio_report(&config),
        Some(Command::Vocab { category }) => list_vocabulary(category.as_deref()),
        None => run_tui(config),
    }
}

fn clip_store(config: &Config) -> Box<dyn ClipStore> {
    if let Some(store) = config.audio_base_url.as_deref().and_then(http_clip_store) {
        return store;
    }
    Box::new(DirClipStore::new(&config.audio_dir))
}

#[cfg(feature = "network")]
fn http_clip_store(url: &str) -> Option<Box<dyn ClipStore>> {
    match otiyot::speech::store::HttpClipStore::new(url) {
        Ok(store) => Some(Box::new(store)),
        Err(err) => {
            warn!(error = %err, "falling back to local audio directory");
            None
        }
    }
}

#[cfg(not(feature = "network"))]
fn http_clip_store(_url: &str) -> Option<Box<dyn ClipStore>> {
    warn!("audio_base_url needs the network feature, using local audio directory");
    None
}

fn speech(config: &Config) -> SpeechOrchestrator {
    let backend = ProcessBackend::new(config.clip_player.clone(), config.synth_command.clone());
    let mut speech = SpeechOrchestrator::new(Box::new(backend), clip_store(config));
    speech.set_default_speed(config.speech_speed);
    speech
}

fn list_exercises() -> Result<()> {
    let catalog = ExerciseCatalog::load()?;
    for entry in catalog.entries() {
        println!("{:>4}  {:<14} {}", entry.index, entry.id, entry.label);
    }
    Ok(())
}

fn show_exercise(id: &str, seed: Option<u64>) -> Result<()> {
    let mut catalog = match seed {
        Some(seed) => ExerciseCatalog::with_seed(seed)?,
        None => ExerciseCatalog::load()?,
    };
    if !catalog.select_by_id(id) {
        println!("No exercise with id {id}");
        return Ok(());
    }
    if let Some(exercise) = catalog.current() {
        println!("{}", exercise.label);
        for line in &exercise.text {
            println!("{line}");
        }
    }
    Ok(())
}

fn speak_item(config: &Config, item_id: &str, text: Option<String>, slow: bool) -> Result<()> {
    let text = match text {
        Some(text) => text,
        None => match data::find_speakable(item_id)? {
            Some(item) => item.hebrew,
            None => {
                println!("No vocabulary or phrase item {item_id}");
                return Ok(());
            }
        },
    };
    let speed = slow.then_some(SpeechSpeed::Slow);

    let mut speech = speech(config);
    let completion = speech.speak_item(item_id, &text, speed);
    let source = match completion.source() {
        SpeechSource::Prerendered => format!("clip {}", completion.path()),
        SpeechSource::Synthesized => "synthesized".to_string(),
    };
    let outcome = completion.wait()?;
    println!("{text} ({source}): {outcome:?}");
    Ok(())
}

fn list_vocabulary(category: Option<&str>) -> Result<()> {
    let items = data::vocabulary()?;
    let Some(category) = category else {
        for name in data::vocabulary_categories(&items) {
            let count = items.iter().filter(|item| item.category == name).count();
            println!("{name:<16} {count}");
        }
        return Ok(());
    };
    let mut found = false;
    for item in items.iter().filter(|item| item.category == category) {
        found = true;
        println!(
            "{:<6} {:<12} {:<16} {}",
            item.id, item.hebrew, item.transliteration, item.english
        );
    }
    if !found {
        println!("No vocabulary category {category}");
    }
    Ok(())
}

fn audio_report(config: &Config) -> Result<()> {
    let clips = clip_store(config);
    let (mut present, mut missing, mut errors) = (0usize, 0usize, 0usize);
    for item in data::speakable_items()? {
        let path = clip_path(&item.id);
        match clips.probe(&path) {
            Ok(true) => present += 1,
            Ok(false) => {
                missing += 1;
                warn!(item_id = %item.id, path = %clips.locate(&path), "clip missing");
            }
            Err(err) => {
                errors += 1;
                warn!(item_id = %item.id, error = %err, "clip check failed");
            }
        }
    }
    println!("{present} present, {missing} missing, {errors} unchecked");
    Ok(())
}

fn run_tui(config: Config) -> Result<()> {
    let catalog = ExerciseCatalog::load()?;
    let store = JsonStore::new()
        .inspect_err(|err| warn!(error = %err, "progress will not be saved"))
        .ok();
    let tick_rate = Duration::from_millis(config.tick_rate_ms);
    let speech = speech(&config);
    let mut app = App::new(config, catalog, speech, store).with_config_path(Config::config_path());
    info!("starting terminal UI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(tick_rate);

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(error = %err, "terminal UI stopped");
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
            AppEvent::Tick => app.tick(Instant::now()),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Release and Repeat would double-count keystrokes.
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    match app.screen {
        AppScreen::ExerciseList => handle_list_key(app, key),
        AppScreen::Typing => handle_typing_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Up | KeyCode::Char('k') => app.list_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.list_next(),
        KeyCode::Enter => app.open_selected(),
        KeyCode::Char('c') => app.continue_last(),
        KeyCode::Char('p') => app.toggle_practice_mode(),
        _ => {}
    }
}

fn handle_typing_key(app: &mut App, key: KeyEvent) {
    let now = Instant::now();
    match key.code {
        KeyCode::Esc => app.go_to_list(),
        KeyCode::Backspace => app.backspace(now),
        KeyCode::Enter => app.type_char('\n', now),
        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => match ch {
            'r' => app.regenerate(),
            's' => app.speak_current_line(),
            't' => app.toggle_speed(),
            'k' => app.toggle_keyboard(),
            'p' => app.toggle_practice_mode(),
            _ => {}
        },
        KeyCode::Char(ch) => app.type_char(ch, now),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => app.next_exercise(),
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('q') | KeyCode::Esc => app.go_to_list(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::ExerciseList => render_list(frame, app),
        AppScreen::Typing => render_typing(frame, app),
        AppScreen::Result => render_result(frame, app),
    }
}

fn render_status(frame: &mut ratatui::Frame, app: &App, hints: &[&str], area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let mut lines: Vec<Line> = Vec::new();
    if let Some(status) = app.status.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("  {status}"),
            Style::default().fg(colors.error()),
        )));
    }
    lines.extend(
        pack_hint_lines(hints, area.width as usize)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_pending())))),
    );
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_list(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let list_area = centered_rect(70, 85, area);
    let entries = app.catalog.entries();
    let list = ExerciseList::new(&entries, app.list_selected, &app.history, app.theme);
    frame.render_widget(list, list_area);

    let footer_area = ratatui::layout::Rect::new(
        area.x,
        (list_area.y + list_area.height).min(area.bottom().saturating_sub(2)),
        area.width,
        2.min(area.height),
    );
    let mode = if app.settings.practice_mode { "[p] Test mode" } else { "[p] Practice mode" };
    render_status(
        frame,
        app,
        &["[Enter] Start", "[c] Continue", mode, "[q] Quit"],
        footer_area,
    );
}

fn render_typing(frame: &mut ratatui::Frame, app: &App) {
    let (Some(exercise), Some(typing)) = (app.current_exercise(), app.typing.as_ref()) else {
        return;
    };
    let area = frame.area();
    let colors = &app.theme.colors;
    let layout = AppLayout::new(area, app.settings.show_keyboard);

    let mut header_spans = vec![
        Span::styled(
            format!(" {} ", exercise.label),
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "| WPM: {} | Acc: {:.1}% | Typos: {} | Speech: {} ",
                app.wpm.wpm(),
                typing.accuracy(),
                typing.typo_count(),
                app.speech.default_speed().label(),
            ),
            Style::default().fg(colors.header_fg()).bg(colors.header_bg()),
        ),
    ];
    let next = typing.expected();
    if app.settings.practice_mode
        && let Some(assignment) = next.and_then(|ch| finger::hebrew_finger(&app.layout, ch))
    {
        header_spans.push(Span::styled(
            format!("| {} ", assignment.describe()),
            Style::default().fg(colors.focused_key()).bg(colors.header_bg()),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(header_spans)).style(Style::default().bg(colors.header_bg())),
        layout.header,
    );

    frame.render_widget(TypingArea::new(typing, "Type", app.theme), layout.main);

    if let Some(progress_area) = layout.progress {
        let bar = match app.letter_progress() {
            Some(ratio) => ProgressBar::new("Letters", ratio, app.theme),
            None => ProgressBar::new("Text", typing.progress(), app.theme),
        };
        frame.render_widget(bar, progress_area);
    }

    if let Some(keyboard_area) = layout.keyboard {
        let known = if exercise.is_letter_exercise() {
            app.catalog.curriculum().distinct_letters_up_to(exercise.index)
        } else {
            app.catalog.curriculum().distinct_letters_up_to(usize::MAX)
        };
        let hint = if app.settings.practice_mode { next } else { None };
        frame.render_widget(
            KeyboardDiagram::new(&app.layout, hint, &known, app.theme),
            keyboard_area,
        );
    }

    render_status(
        frame,
        app,
        &[
            "[Esc] Exercises",
            "[^S] Speak line",
            "[^T] Speed",
            "[^K] Keyboard",
            "[^P] Hints",
            "[^R] New text",
        ],
        layout.footer,
    );
}

fn render_result(frame: &mut ratatui::Frame, app: &App) {
    if let Some(result) = app.last_result.as_ref() {
        let centered = centered_rect(60, 60, frame.area());
        let best = app.history.best_wpm(&result.exercise_id);
        frame.render_widget(ResultPanel::new(result, best, app.theme), centered);
    }
}
