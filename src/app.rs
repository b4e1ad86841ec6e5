use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::config::Config;
#[cfg(feature = "network")]
use crate::document::AlignmentLink;
use crate::document::{Document, ParallelSentence, Provenance};
use crate::logger::interaction_log::InteractionLogger;
use crate::logger::record::InputEvent;
use crate::store::json_store::DocumentStore;
use crate::ui::components::menu::Menu;
use crate::ui::components::sentence_panel::{Hit, PanelLayout};
use crate::ui::edit_field::{EditField, InputResult};
use crate::ui::theme::Theme;
#[cfg(feature = "network")]
use crate::translate::client::TranslationClient;

pub const SAMPLE_DOCUMENT: &str = include_str!("../assets/samples/demo.json");

/// Language codes offered by the settings screen.
pub const LANGS: [&str; 6] = ["en", "fr", "de", "es", "it", "pt"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Editor,
    Settings,
}

pub struct App {
    pub screen: AppScreen,
    pub document: Document,
    pub store: Option<DocumentStore>,
    pub current: usize,
    pub edit: EditField,
    pub menu: Menu<'static>,
    pub theme: &'static Theme,
    pub config: Config,
    pub logger: InteractionLogger,
    pub hover: Option<Hit>,
    pub pressed: Option<Hit>,
    pub panel_area: Rect,
    pub status: Option<String>,
    pub should_quit: bool,
    pub settings_selected: usize,
}

impl App {
    pub fn new(
        document: Document,
        store: Option<DocumentStore>,
        config: Config,
        logger: InteractionLogger,
    ) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let document_name = (!document.name.is_empty()).then(|| document.name.clone());
        let menu = Menu::new(theme, document_name.as_deref());
        let edit = EditField::new(&initial_field_text(&document, 0));

        Self {
            screen: AppScreen::Menu,
            document,
            store,
            current: 0,
            edit,
            menu,
            theme,
            config,
            logger,
            hover: None,
            pressed: None,
            panel_area: Rect::default(),
            status: None,
            should_quit: false,
            settings_selected: 0,
        }
    }

    pub fn current_sentence(&self) -> Option<&ParallelSentence> {
        self.document.sentences.get(self.current)
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
        self.hover = None;
        self.status = None;
    }

    pub fn go_to_editor(&mut self) {
        self.screen = AppScreen::Editor;
        self.status = None;
    }

    pub fn go_to_settings(&mut self) {
        self.screen = AppScreen::Settings;
        self.settings_selected = 0;
    }

    pub fn open_sentence(&mut self, index: usize) {
        if self.document.is_empty() {
            return;
        }
        self.current = index.min(self.document.len() - 1);
        self.edit = EditField::new(&initial_field_text(&self.document, self.current));
        self.hover = None;
        self.pressed = None;
    }

    pub fn next_sentence(&mut self) {
        if self.current + 1 < self.document.len() {
            self.open_sentence(self.current + 1);
        }
    }

    pub fn prev_sentence(&mut self) {
        if self.current > 0 {
            self.open_sentence(self.current - 1);
        }
    }

    /// Route one key to the edit field and immediately write the field's
    /// new value through to the document. No buffering, no dirty flag: the
    /// in-memory document always matches what the field shows.
    pub fn field_key(&mut self, key: KeyEvent) -> InputResult {
        let result = self.edit.handle(key);
        self.write_through();
        result
    }

    pub fn write_through(&mut self) {
        let value = self.edit.value().to_string();
        if let Some(sentence) = self.document.sentences.get_mut(self.current) {
            sentence.set_edited(&value);
        }
    }

    pub fn paste(&mut self, text: &str) {
        if self.screen != AppScreen::Editor {
            return;
        }
        for ch in text.chars().filter(|ch| !ch.is_control()) {
            self.edit.handle(KeyEvent::from(crossterm::event::KeyCode::Char(ch)));
        }
        self.write_through();
        let event = InputEvent::Other {
            description: format!("paste ({} chars)", text.chars().count()),
        };
        let identity = self.keyboard_identity();
        self.logger.log(&event, &identity);
    }

    pub fn save_document(&mut self) {
        let Some(ref store) = self.store else {
            self.status = Some("No file to save to (sample document)".to_string());
            return;
        };
        match store.save(&self.document) {
            Ok(()) => {
                self.status = Some(format!("Saved {}", store.path().display()));
            }
            Err(e) => {
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }

    /// Identity of the widget that owns the keyboard: the correction field
    /// while editing, the panel chrome everywhere else.
    pub fn keyboard_identity(&self) -> String {
        match (self.screen, self.current_sentence()) {
            (AppScreen::Editor, Some(sentence)) => self.document.widget_identity(
                sentence.sentence_number,
                Provenance::Field,
                Some(self.edit.cursor()),
                self.edit.value(),
            ),
            _ => self
                .document
                .widget_identity(self.current, Provenance::Panel, None, ""),
        }
    }

    fn pointer_identity(&self, hit: Option<Hit>) -> String {
        let Some(sentence) = self.current_sentence() else {
            return self
                .document
                .widget_identity(self.current, Provenance::Panel, None, "");
        };
        let n = sentence.sentence_number;
        match hit {
            Some(Hit::SourceWord(i)) => self.document.widget_identity(
                n,
                Provenance::Source,
                Some(i),
                &sentence.source_words[i],
            ),
            Some(Hit::TargetWord(i)) => self.document.widget_identity(
                n,
                Provenance::Target,
                Some(i),
                &sentence.target_words[i],
            ),
            Some(Hit::EditField) => self.document.widget_identity(
                n,
                Provenance::Field,
                Some(self.edit.cursor()),
                self.edit.value(),
            ),
            Some(Hit::Panel) | None => {
                self.document.widget_identity(n, Provenance::Panel, None, "")
            }
        }
    }

    pub fn log_keyboard(&mut self, event: InputEvent) {
        let identity = self.keyboard_identity();
        self.logger.log(&event, &identity);
    }

    pub fn focus_changed(&mut self, gained: bool) {
        self.write_through();
        let event = if gained {
            InputEvent::FocusGained
        } else {
            InputEvent::FocusLost
        };
        self.log_keyboard(event);
    }

    fn hit_at(&self, column: u16, row: u16) -> Option<Hit> {
        if self.screen != AppScreen::Editor {
            return None;
        }
        let sentence = self.current_sentence()?;
        PanelLayout::compute(sentence, self.panel_area).hit_test(column, row)
    }

    /// Classify one terminal mouse event, synthesize the enter/exit/click
    /// events the terminal does not deliver, and log everything attributed
    /// to the widget under the cursor.
    pub fn pointer_event(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        let hit = self.hit_at(column, row);
        let identity = self.pointer_identity(hit);

        match mouse.kind {
            MouseEventKind::Down(button) => {
                self.pressed = hit;
                let event = InputEvent::PointerPressed {
                    button: button_name(button),
                    column,
                    row,
                };
                self.logger.log(&event, &identity);
            }
            MouseEventKind::Up(button) => {
                let button = button_name(button);
                self.logger.log(
                    &InputEvent::PointerReleased { button, column, row },
                    &identity,
                );
                // A click is press and release over the same widget.
                if self.pressed == hit {
                    self.logger.log(
                        &InputEvent::PointerClicked { button, column, row },
                        &identity,
                    );
                }
                self.pressed = None;
            }
            MouseEventKind::Drag(button) => {
                let event = InputEvent::PointerDragged {
                    button: button_name(button),
                    column,
                    row,
                };
                self.logger.log(&event, &identity);
            }
            MouseEventKind::Moved => {
                if hit != self.hover {
                    if self.hover.is_some() {
                        let old_identity = self.pointer_identity(self.hover);
                        self.logger
                            .log(&InputEvent::PointerExited { column, row }, &old_identity);
                    }
                    if hit.is_some() {
                        self.logger
                            .log(&InputEvent::PointerEntered { column, row }, &identity);
                    }
                    self.hover = hit;
                }
                self.logger
                    .log(&InputEvent::PointerMoved { column, row }, &identity);
            }
            MouseEventKind::ScrollDown => {
                self.logger.log(
                    &InputEvent::PointerWheel { delta: 1, column, row },
                    &identity,
                );
                if self.screen == AppScreen::Editor {
                    self.next_sentence();
                }
            }
            MouseEventKind::ScrollUp => {
                self.logger.log(
                    &InputEvent::PointerWheel { delta: -1, column, row },
                    &identity,
                );
                if self.screen == AppScreen::Editor {
                    self.prev_sentence();
                }
            }
            _ => {}
        }
    }

    #[cfg(feature = "network")]
    pub fn retranslate_current(&mut self) {
        let Some(sentence) = self.current_sentence() else {
            return;
        };
        let source_text = sentence.source_words.join(" ");
        let client = TranslationClient::new(&self.config.api_endpoint, self.config.api_key.clone());
        let result = client.translate_batch(
            &[source_text],
            &self.config.source_lang,
            &self.config.target_lang,
        );
        match result {
            Ok(mut translations) if !translations.is_empty() => {
                let translation = translations.remove(0);
                let links = parse_word_alignment(&translation.word_alignment);
                let sentence = &mut self.document.sentences[self.current];
                sentence.target_words = translation
                    .translated_text
                    .split_whitespace()
                    .map(str::to_string)
                    .collect();
                sentence.alignment = links;
                self.edit.set_value(&translation.translated_text);
                self.write_through();
                self.status = Some("Retranslated".to_string());
            }
            Ok(_) => {
                self.status = Some("Translation service returned no result".to_string());
            }
            Err(e) => {
                self.status = Some(format!("Translation failed: {e}"));
            }
        }
    }

    pub fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                let themes = Theme::available_themes();
                if themes.is_empty() {
                    return;
                }
                let pos = themes
                    .iter()
                    .position(|t| *t == self.config.theme)
                    .unwrap_or(0);
                let next = cycle(pos, themes.len(), forward);
                self.config.theme = themes[next].clone();
                self.apply_theme();
            }
            1 => {
                let pos = LANGS
                    .iter()
                    .position(|l| *l == self.config.source_lang)
                    .unwrap_or(0);
                self.config.source_lang = LANGS[cycle(pos, LANGS.len(), forward)].to_string();
            }
            2 => {
                let pos = LANGS
                    .iter()
                    .position(|l| *l == self.config.target_lang)
                    .unwrap_or(0);
                self.config.target_lang = LANGS[cycle(pos, LANGS.len(), forward)].to_string();
            }
            _ => {}
        }
    }

    fn apply_theme(&mut self) {
        if let Some(theme) = Theme::load(&self.config.theme) {
            let theme: &'static Theme = Box::leak(Box::new(theme));
            self.theme = theme;
            self.menu.theme = theme;
        }
    }
}

fn cycle(pos: usize, len: usize, forward: bool) -> usize {
    if forward {
        (pos + 1) % len
    } else if pos == 0 {
        len - 1
    } else {
        pos - 1
    }
}

/// The field starts from the previous correction, or from the machine
/// translation when the sentence has not been edited yet.
fn initial_field_text(document: &Document, index: usize) -> String {
    match document.sentences.get(index) {
        Some(s) if !s.edited().is_empty() => s.edited().to_string(),
        Some(s) => s.target_words.join(" "),
        None => String::new(),
    }
}

#[cfg(feature = "network")]
fn parse_word_alignment(text: &str) -> Vec<AlignmentLink> {
    text.split_whitespace()
        .filter_map(|pair| {
            let (s, t) = pair.split_once('-')?;
            Some(AlignmentLink::new(s.parse().ok()?, t.parse().ok()?))
        })
        .collect()
}

pub fn button_name(button: MouseButton) -> &'static str {
    match button {
        MouseButton::Left => "Left",
        MouseButton::Middle => "Middle",
        MouseButton::Right => "Right",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use tempfile::TempDir;

    fn test_app(dir: &TempDir) -> App {
        let document = DocumentStore::parse(SAMPLE_DOCUMENT).unwrap();
        let logger = InteractionLogger::create(dir.path().join("session.log")).unwrap();
        App::new(document, None, Config::default(), logger)
    }

    #[test]
    fn test_field_starts_from_machine_translation() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);
        assert_eq!(app.edit.value(), "le chat était assis sur le tapis");
    }

    #[test]
    fn test_field_key_writes_through_immediately() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.go_to_editor();
        app.field_key(KeyEvent::from(KeyCode::Char('!')));
        assert_eq!(
            app.document.sentences[0].edited(),
            "le chat était assis sur le tapis!"
        );
    }

    #[test]
    fn test_focus_change_writes_through_and_logs() {
        let dir = TempDir::new().unwrap();
        let log_path = dir.path().join("session.log");
        let mut app = test_app(&dir);
        app.go_to_editor();

        // Mutate the field directly, bypassing field_key: the focus change
        // itself must copy the field into the document.
        app.edit.handle(KeyEvent::from(KeyCode::Char('!')));
        assert!(app.document.sentences[0].edited().is_empty());
        app.focus_changed(true);
        assert_eq!(app.document.sentences[0].edited(), app.edit.value());

        app.edit.handle(KeyEvent::from(KeyCode::Char('?')));
        app.focus_changed(false);
        assert!(app.document.sentences[0].edited().ends_with("!?"));

        drop(app);
        let text = std::fs::read_to_string(&log_path).unwrap();
        let kinds: Vec<&str> = text
            .lines()
            .filter_map(|l| l.split('\t').nth(1))
            .collect();
        assert!(kinds.contains(&"FOCUS_GAINED"));
        assert!(kinds.contains(&"FOCUS_LOST"));
    }

    #[test]
    fn test_field_key_reports_submit_and_cancel() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.go_to_editor();
        assert_eq!(
            app.field_key(KeyEvent::from(KeyCode::Enter)),
            InputResult::Submit
        );
        assert_eq!(
            app.field_key(KeyEvent::from(KeyCode::Esc)),
            InputResult::Cancel
        );
    }

    #[test]
    fn test_navigation_preserves_edits_and_reloads_field() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.go_to_editor();
        app.field_key(KeyEvent::from(KeyCode::Char('x')));
        app.next_sentence();
        assert_eq!(app.current, 1);
        assert_eq!(app.edit.value(), "j'ai vu une maison rouge");
        app.prev_sentence();
        assert!(app.edit.value().ends_with('x'));
    }

    #[test]
    fn test_keyboard_identity_names_the_field_in_editor() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.go_to_editor();
        let identity = app.keyboard_identity();
        let fields: Vec<&str> = identity.split('\t').collect();
        assert_eq!(fields[0], "1"); // document number
        assert_eq!(fields[1], "0"); // sentence number
        assert_eq!(fields[2], "Field");
        assert_eq!(fields[4], "le chat était assis sur le tapis");
    }

    #[test]
    fn test_wheel_navigates_sentences_in_editor() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.go_to_editor();
        let wheel = |kind| MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: crossterm::event::KeyModifiers::NONE,
        };
        app.pointer_event(wheel(MouseEventKind::ScrollDown));
        assert_eq!(app.current, 1);
        app.pointer_event(wheel(MouseEventKind::ScrollUp));
        assert_eq!(app.current, 0);
    }

    #[test]
    fn test_settings_cycle_changes_target_lang() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.settings_selected = 2;
        let before = app.config.target_lang.clone();
        app.settings_cycle(true);
        assert_ne!(app.config.target_lang, before);
        app.settings_cycle(false);
        assert_eq!(app.config.target_lang, before);
    }
}
