use std::fmt;

/// Classified interaction event kinds, one tag per log record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerPressed,
    PointerReleased,
    PointerClicked,
    PointerEntered,
    PointerExited,
    PointerMoved,
    PointerDragged,
    PointerWheel,
    KeyPressed,
    KeyReleased,
    KeyTyped,
    FocusGained,
    FocusLost,
    Unknown,
}

impl EventKind {
    pub fn tag(self) -> &'static str {
        match self {
            EventKind::PointerPressed => "POINTER_PRESSED",
            EventKind::PointerReleased => "POINTER_RELEASED",
            EventKind::PointerClicked => "POINTER_CLICKED",
            EventKind::PointerEntered => "POINTER_ENTERED",
            EventKind::PointerExited => "POINTER_EXITED",
            EventKind::PointerMoved => "POINTER_MOVED",
            EventKind::PointerDragged => "POINTER_DRAGGED",
            EventKind::PointerWheel => "POINTER_WHEEL",
            EventKind::KeyPressed => "KEY_PRESSED",
            EventKind::KeyReleased => "KEY_RELEASED",
            EventKind::KeyTyped => "KEY_TYPED",
            EventKind::FocusGained => "FOCUS_GAINED",
            EventKind::FocusLost => "FOCUS_LOST",
            EventKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// An interaction event as observed by the host, before classification.
///
/// Positions are terminal cells. Key names are crossterm's textual key
/// representations; typed characters are the literal characters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    PointerPressed { button: &'static str, column: u16, row: u16 },
    PointerReleased { button: &'static str, column: u16, row: u16 },
    PointerClicked { button: &'static str, column: u16, row: u16 },
    PointerEntered { column: u16, row: u16 },
    PointerExited { column: u16, row: u16 },
    PointerMoved { column: u16, row: u16 },
    PointerDragged { button: &'static str, column: u16, row: u16 },
    PointerWheel { delta: i8, column: u16, row: u16 },
    KeyPressed { key: String },
    KeyReleased { key: String },
    KeyTyped { ch: char },
    FocusGained,
    FocusLost,
    Other { description: String },
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::PointerPressed { .. } => EventKind::PointerPressed,
            InputEvent::PointerReleased { .. } => EventKind::PointerReleased,
            InputEvent::PointerClicked { .. } => EventKind::PointerClicked,
            InputEvent::PointerEntered { .. } => EventKind::PointerEntered,
            InputEvent::PointerExited { .. } => EventKind::PointerExited,
            InputEvent::PointerMoved { .. } => EventKind::PointerMoved,
            InputEvent::PointerDragged { .. } => EventKind::PointerDragged,
            InputEvent::PointerWheel { .. } => EventKind::PointerWheel,
            InputEvent::KeyPressed { .. } => EventKind::KeyPressed,
            InputEvent::KeyReleased { .. } => EventKind::KeyReleased,
            InputEvent::KeyTyped { .. } => EventKind::KeyTyped,
            InputEvent::FocusGained => EventKind::FocusGained,
            InputEvent::FocusLost => EventKind::FocusLost,
            InputEvent::Other { .. } => EventKind::Unknown,
        }
    }

    /// The detail field: key name for press/release, literal character for
    /// typed (a tab becomes the text `TAB` so the record stays a valid
    /// tab-separated line), empty for everything else.
    pub fn detail(&self) -> String {
        match self {
            InputEvent::KeyPressed { key } | InputEvent::KeyReleased { key } => key.clone(),
            InputEvent::KeyTyped { ch } => printable_char(*ch),
            _ => String::new(),
        }
    }

    /// One-field free-text summary. Never contains a tab.
    pub fn summary(&self) -> String {
        match self {
            InputEvent::PointerPressed { button, column, row }
            | InputEvent::PointerReleased { button, column, row }
            | InputEvent::PointerClicked { button, column, row }
            | InputEvent::PointerDragged { button, column, row } => {
                format!("{button} ({column},{row})")
            }
            InputEvent::PointerEntered { column, row }
            | InputEvent::PointerExited { column, row }
            | InputEvent::PointerMoved { column, row } => format!("({column},{row})"),
            InputEvent::PointerWheel { delta, column, row } => {
                format!("delta={delta} ({column},{row})")
            }
            InputEvent::KeyPressed { key } | InputEvent::KeyReleased { key } => {
                format!("key={key}")
            }
            InputEvent::KeyTyped { ch } => format!("char={}", printable_char(*ch)),
            InputEvent::FocusGained => "gained".to_string(),
            InputEvent::FocusLost => "lost".to_string(),
            InputEvent::Other { description } => description.replace('\t', " "),
        }
    }
}

fn printable_char(ch: char) -> String {
    if ch == '\t' {
        "TAB".to_string()
    } else {
        ch.to_string()
    }
}

/// Format one record as a tab-separated line terminated by a newline.
///
/// Fields: elapsed_ms, kind, detail, summary, identity. The identity is
/// itself tab-joined and always comes last, so its embedded tabs extend the
/// line rather than corrupting the fixed-position fields before it.
pub fn format_line(elapsed_ms: u64, event: &InputEvent, identity: &str) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\n",
        elapsed_ms,
        event.kind(),
        event.detail(),
        event.summary(),
        identity
    )
}
