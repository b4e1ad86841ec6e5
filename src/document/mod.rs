pub mod sentence;

pub use sentence::{AlignmentLink, Document, ParallelSentence, Provenance};
