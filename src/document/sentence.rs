use std::fmt;

/// Where a rendered text element comes from: the source sentence, the
/// machine translation, the human-edited field, or the panel chrome itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Provenance {
    Source,
    Target,
    Field,
    Panel,
}

impl Provenance {
    pub fn as_str(self) -> &'static str {
        match self {
            Provenance::Source => "Source",
            Provenance::Target => "Target",
            Provenance::Field => "Field",
            Provenance::Panel => "Panel",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One translational correspondence: source word index paired with target
/// word index. Indices are the caller's contract; the renderer indexes the
/// word rows directly and panics on an out-of-range link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlignmentLink {
    pub source: usize,
    pub target: usize,
}

impl AlignmentLink {
    pub fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }
}

/// A source sentence, its machine translation, the alignment links between
/// them, and the human-edited correction. The sentence panel is a pure
/// consumer of the word rows and the only mutator of `edited`.
#[derive(Clone, Debug)]
pub struct ParallelSentence {
    pub sentence_number: usize,
    pub source_words: Vec<String>,
    pub target_words: Vec<String>,
    pub alignment: Vec<AlignmentLink>,
    edited: String,
}

impl ParallelSentence {
    pub fn new(
        sentence_number: usize,
        source_words: Vec<String>,
        target_words: Vec<String>,
        alignment: Vec<AlignmentLink>,
        edited: String,
    ) -> Self {
        Self {
            sentence_number,
            source_words,
            target_words,
            alignment,
            edited,
        }
    }

    pub fn edited(&self) -> &str {
        &self.edited
    }

    /// Write-through target for the edit field: called on every keystroke
    /// and focus change, unbuffered.
    pub fn set_edited(&mut self, text: &str) {
        if self.edited != text {
            self.edited.clear();
            self.edited.push_str(text);
        }
    }
}

/// An ordered collection of parallel sentences under post-editing.
#[derive(Clone, Debug)]
pub struct Document {
    pub document_number: i64,
    pub name: String,
    pub source_lang: String,
    pub target_lang: String,
    pub sentences: Vec<ParallelSentence>,
}

impl Document {
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Textual identity of a widget inside this document, as it appears in
    /// the interaction log: tab-joined document number, sentence number,
    /// provenance, word number (or caret position for the edit field, or
    /// empty for the panel), and the widget's current text.
    pub fn widget_identity(
        &self,
        sentence_number: usize,
        provenance: Provenance,
        word: Option<usize>,
        text: &str,
    ) -> String {
        let word = match word {
            Some(n) => n.to_string(),
            None => String::new(),
        };
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.document_number, sentence_number, provenance, word, text
        )
    }
}
