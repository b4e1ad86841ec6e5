pub mod alignment;
#[cfg(feature = "network")]
pub mod client;

pub use alignment::{char_to_word_index, derive_word_links, word_alignment_string};
#[cfg(feature = "network")]
pub use client::{BatchTranslation, TranslateError, TranslationClient};
