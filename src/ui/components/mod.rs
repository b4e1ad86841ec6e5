pub mod menu;
pub mod sentence_panel;

pub use menu::Menu;
pub use sentence_panel::{Hit, PanelLayout, SentencePanel};
