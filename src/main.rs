mod app;
mod config;
mod document;
mod event;
mod logger;
mod store;
mod translate;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use app::{App, AppScreen, SAMPLE_DOCUMENT};
use config::Config;
use event::{AppEvent, EventHandler};
use logger::interaction_log::InteractionLogger;
use logger::record::InputEvent;
use store::json_store::DocumentStore;
use ui::components::sentence_panel::SentencePanel;
use ui::edit_field::InputResult;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(
    name = "postedit",
    version,
    about = "Terminal post-editor for machine-translated parallel text"
)]
struct Cli {
    #[arg(help = "Parallel document to edit (JSON)")]
    document: Option<PathBuf>,

    #[arg(short, long, help = "Interaction log destination (.gz compresses)")]
    log: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Source language code")]
    from: Option<String>,

    #[arg(long, help = "Target language code")]
    to: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(from) = cli.from {
        config.source_lang = from;
    }
    if let Some(to) = cli.to {
        config.target_lang = to;
    }
    config.normalize_langs();

    let (document, store) = match cli.document {
        Some(path) => {
            let store = DocumentStore::new(&path);
            let document = store.load()?;
            (document, Some(store))
        }
        None => (DocumentStore::parse(SAMPLE_DOCUMENT)?, None),
    };

    let logger = match cli.log {
        Some(path) => InteractionLogger::create(path)?,
        None => InteractionLogger::session_default(&config.log_dir)?,
    };

    let mut app = App::new(document, store, config, logger);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange,
        EnableBracketedPaste
    )?;

    // Try to enable keyboard enhancement for Release event support
    let keyboard_enhanced = execute!(
        io::stdout(),
        PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
    )
    .is_ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    if keyboard_enhanced {
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
    }
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    // The document and the session log outlive the terminal session.
    app.write_through();
    if app.store.is_some() {
        app.save_document();
    }
    app.logger.finish();

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
            AppEvent::Mouse(mouse) => app.pointer_event(mouse),
            AppEvent::FocusGained => app.focus_changed(true),
            AppEvent::FocusLost => app.focus_changed(false),
            AppEvent::Paste(text) => app.paste(&text),
            AppEvent::Tick => {}
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match key.kind {
        KeyEventKind::Release => {
            app.log_keyboard(InputEvent::KeyReleased {
                key: key_name(key.code),
            });
            return;
        }
        // Ignore Repeat to avoid inflating input
        KeyEventKind::Repeat => return,
        KeyEventKind::Press => {}
    }

    app.log_keyboard(InputEvent::KeyPressed {
        key: key_name(key.code),
    });
    if let KeyCode::Char(ch) = key.code
        && !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        app.log_keyboard(InputEvent::KeyTyped { ch });
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Editor => handle_editor_key(app, key),
        AppScreen::Settings => handle_settings_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('1') => app.go_to_editor(),
        KeyCode::Char('2') => open_sample(app),
        KeyCode::Char('c') => app.go_to_settings(),
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => match app.menu.selected {
            0 => app.go_to_editor(),
            1 => open_sample(app),
            2 => app.go_to_settings(),
            3 => app.should_quit = true,
            _ => {}
        },
        _ => {}
    }
}

fn open_sample(app: &mut App) {
    match DocumentStore::parse(SAMPLE_DOCUMENT) {
        Ok(document) => {
            app.document = document;
            app.store = None;
            app.open_sentence(0);
            app.go_to_editor();
        }
        Err(e) => app.status = Some(format!("Sample document failed to load: {e}")),
    }
}

fn handle_editor_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('s') => app.save_document(),
            KeyCode::Char('t') => retranslate(app),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Tab | KeyCode::Down => app.next_sentence(),
        KeyCode::BackTab | KeyCode::Up => app.prev_sentence(),
        _ => match app.field_key(key) {
            InputResult::Submit => app.next_sentence(),
            InputResult::Cancel => app.go_to_menu(),
            InputResult::Continue => {}
        },
    }
}

#[cfg(feature = "network")]
fn retranslate(app: &mut App) {
    app.retranslate_current();
}

#[cfg(not(feature = "network"))]
fn retranslate(app: &mut App) {
    app.status = Some("Built without network support".to_string());
}

fn handle_settings_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            let _ = app.config.save();
            app.go_to_menu();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if app.settings_selected > 0 {
                app.settings_selected -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.settings_selected < 2 {
                app.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
            app.settings_cycle(true);
        }
        KeyCode::Left | KeyCode::Char('h') => {
            app.settings_cycle(false);
        }
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Editor => render_editor(frame, app),
        AppScreen::Settings => render_settings(frame, app),
    }
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header_info = format!(
        " {} | {} -> {} | {} sentences",
        app.document.name, app.config.source_lang, app.config.target_lang, app.document.len(),
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " postedit ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            &*header_info,
            Style::default().fg(colors.text_dim()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout[0]);

    let menu_area = ui::layout::centered_rect(50, 80, layout[1]);
    frame.render_widget(&app.menu, menu_area);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " [1] Edit  [2] Sample  [c] Settings  [q] Quit ",
        Style::default().fg(colors.text_dim()),
    )]));
    frame.render_widget(footer, layout[2]);
}

fn render_editor(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let app_layout = AppLayout::new(area);

    let edited_count = app
        .document
        .sentences
        .iter()
        .filter(|s| !s.edited().is_empty())
        .count();
    let header_text = format!(
        " {} | {} -> {} | sentence {}/{} | {} edited",
        app.document.name,
        app.config.source_lang,
        app.config.target_lang,
        (app.current + 1).min(app.document.len()),
        app.document.len(),
        edited_count,
    );
    let header = Paragraph::new(Line::from(Span::styled(
        &*header_text,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, app_layout.header);

    // The pointer hit-testing recomputes the panel geometry from this rect.
    app.panel_area = app_layout.main;

    match app.current_sentence() {
        Some(sentence) => {
            let edited_marker = if sentence.edited().is_empty() { "" } else { "*" };
            let title = format!(
                " Sentence {}/{}{} ",
                app.current + 1,
                app.document.len(),
                edited_marker
            );
            let panel = SentencePanel::new(sentence, &app.edit, app.theme, title)
                .hover(app.hover);
            frame.render_widget(panel, app_layout.main);
        }
        None => {
            let empty = Paragraph::new(Line::from(Span::styled(
                " Document has no sentences ",
                Style::default().fg(colors.text_dim()),
            )))
            .block(Block::bordered().border_style(Style::default().fg(colors.border())));
            frame.render_widget(empty, app_layout.main);
        }
    }

    if let Some(sidebar_area) = app_layout.sidebar {
        let mut lines = Vec::with_capacity(app.document.len());
        for (i, sentence) in app.document.sentences.iter().enumerate() {
            let marker = if i == app.current { ">" } else { " " };
            let edited = if sentence.edited().is_empty() { " " } else { "*" };
            let text = format!("{marker}{edited} {}", sentence.source_words.join(" "));
            let style = if i == app.current {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };
            lines.push(Line::from(Span::styled(text, style)));
        }
        let sidebar = Paragraph::new(lines).block(
            Block::bordered()
                .title(" Sentences ")
                .border_style(Style::default().fg(colors.border())),
        );
        frame.render_widget(sidebar, sidebar_area);
    }

    let footer_text = match app.status {
        Some(ref status) => format!(" {status} "),
        None => {
            " [Tab] Next  [Shift-Tab] Prev  [Ctrl-S] Save  [Ctrl-T] Retranslate  [Esc] Menu "
                .to_string()
        }
    };
    let footer_style = if app.status.is_some() {
        Style::default().fg(colors.accent())
    } else {
        Style::default().fg(colors.text_dim())
    };
    let footer = Paragraph::new(Line::from(Span::styled(&*footer_text, footer_style)));
    frame.render_widget(footer, app_layout.footer);
}

fn render_settings(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = ui::layout::centered_rect(60, 80, area);

    let block = Block::bordered()
        .title(" Settings ")
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let fields: Vec<(String, String)> = vec![
        ("Theme".to_string(), app.config.theme.clone()),
        ("Source language".to_string(), app.config.source_lang.clone()),
        ("Target language".to_string(), app.config.target_lang.clone()),
    ];

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(fields.len() as u16 * 3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let header = Paragraph::new(Line::from(Span::styled(
        "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
        Style::default().fg(colors.text_dim()),
    )));
    header.render(layout[0], frame.buffer_mut());

    let field_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            fields
                .iter()
                .map(|_| Constraint::Length(3))
                .collect::<Vec<_>>(),
        )
        .split(layout[1]);

    for (i, (label, value)) in fields.iter().enumerate() {
        let is_selected = i == app.settings_selected;
        let indicator = if is_selected { " > " } else { "   " };

        let label_text = format!("{indicator}{label}:");
        let value_text = format!("  < {value} >");

        let label_style = Style::default()
            .fg(if is_selected {
                colors.accent()
            } else {
                colors.fg()
            })
            .add_modifier(if is_selected {
                Modifier::BOLD
            } else {
                Modifier::empty()
            });

        let value_style = Style::default().fg(if is_selected {
            colors.word_hover()
        } else {
            colors.text_dim()
        });

        let lines = vec![
            Line::from(Span::styled(label_text, label_style)),
            Line::from(Span::styled(value_text, value_style)),
        ];
        Paragraph::new(lines).render(field_layout[i], frame.buffer_mut());
    }

    let footer = Paragraph::new(Line::from(Span::styled(
        "  [ESC] Save & back  [Enter/arrows] Change value",
        Style::default().fg(colors.accent()),
    )));
    footer.render(layout[3], frame.buffer_mut());
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(ch) => ch.to_string(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}
