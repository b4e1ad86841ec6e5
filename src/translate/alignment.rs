use thiserror::Error;

use crate::document::AlignmentLink;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignmentError {
    #[error("malformed character alignment span: {0:?}")]
    MalformedSpan(String),
    #[error("character offset {offset} out of range for sentence of {len} characters")]
    OffsetOutOfRange { offset: usize, len: usize },
}

/// Map each character position of `sentence` to the index of the
/// whitespace-delimited word containing it, or `None` for whitespace.
/// A word index increments at every whitespace-to-word transition.
pub fn char_to_word_index(sentence: &str) -> Vec<Option<usize>> {
    let mut map = Vec::with_capacity(sentence.chars().count());
    let mut word_index: Option<usize> = None;
    let mut in_whitespace = true;

    for ch in sentence.chars() {
        if ch.is_whitespace() {
            map.push(None);
            in_whitespace = true;
        } else {
            if in_whitespace {
                word_index = Some(word_index.map_or(0, |w| w + 1));
            }
            in_whitespace = false;
            map.push(word_index);
        }
    }
    map
}

/// Derive word-to-word alignment links from a character-offset alignment
/// string of the form `s0:s1-t0:t1 s0:s1-t0:t1 ...`, where each side names
/// a character span and only the span starts matter.
///
/// Spans whose start falls on whitespace carry no word and are skipped.
/// Syntactically malformed spans and out-of-range offsets are errors.
pub fn derive_word_links(
    source: &str,
    target: &str,
    char_alignment: &str,
) -> Result<Vec<AlignmentLink>, AlignmentError> {
    let source_map = char_to_word_index(source);
    let target_map = char_to_word_index(target);

    let mut links = Vec::new();
    for span_pair in char_alignment.split_whitespace() {
        let (source_span, target_span) = span_pair
            .split_once('-')
            .ok_or_else(|| AlignmentError::MalformedSpan(span_pair.to_string()))?;

        let source_start = span_start(source_span)?;
        let target_start = span_start(target_span)?;

        let source_word = word_at(&source_map, source_start)?;
        let target_word = word_at(&target_map, target_start)?;
        if let (Some(s), Some(t)) = (source_word, target_word) {
            links.push(AlignmentLink::new(s, t));
        }
    }
    Ok(links)
}

/// Render links as the service's word-alignment string: space-separated
/// `source-target` index pairs.
pub fn word_alignment_string(links: &[AlignmentLink]) -> String {
    let mut out = String::new();
    for link in links {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&link.source.to_string());
        out.push('-');
        out.push_str(&link.target.to_string());
    }
    out
}

fn span_start(span: &str) -> Result<usize, AlignmentError> {
    let start = span
        .split(':')
        .next()
        .ok_or_else(|| AlignmentError::MalformedSpan(span.to_string()))?;
    start
        .parse()
        .map_err(|_| AlignmentError::MalformedSpan(span.to_string()))
}

fn word_at(map: &[Option<usize>], offset: usize) -> Result<Option<usize>, AlignmentError> {
    map.get(offset)
        .copied()
        .ok_or(AlignmentError::OffsetOutOfRange {
            offset,
            len: map.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_to_word_index_basic() {
        let map = char_to_word_index("the cat");
        assert_eq!(
            map,
            vec![
                Some(0),
                Some(0),
                Some(0),
                None,
                Some(1),
                Some(1),
                Some(1),
            ]
        );
    }

    #[test]
    fn test_char_to_word_index_leading_and_multiple_whitespace() {
        let map = char_to_word_index("  a  b");
        assert_eq!(map, vec![None, None, Some(0), None, None, Some(1)]);
    }

    #[test]
    fn test_derive_word_links_identity_pairs() {
        // "the cat" / "le chat": the->le, cat->chat
        let links = derive_word_links("the cat", "le chat", "0:2-0:1 4:6-3:6").unwrap();
        assert_eq!(
            links,
            vec![AlignmentLink::new(0, 0), AlignmentLink::new(1, 1)]
        );
    }

    #[test]
    fn test_derive_word_links_crossing_alignment() {
        // "red house" / "maison rouge": red->rouge, house->maison
        let links = derive_word_links("red house", "maison rouge", "0:2-7:11 4:8-0:5").unwrap();
        assert_eq!(
            links,
            vec![AlignmentLink::new(0, 1), AlignmentLink::new(1, 0)]
        );
    }

    #[test]
    fn test_whitespace_start_is_skipped() {
        let links = derive_word_links("a b", "x y", "1:1-0:0").unwrap();
        assert!(links.is_empty());
    }

    #[test]
    fn test_malformed_span_is_rejected() {
        let err = derive_word_links("a", "b", "nonsense").unwrap_err();
        assert!(matches!(err, AlignmentError::MalformedSpan(_)));
    }

    #[test]
    fn test_out_of_range_offset_is_rejected() {
        let err = derive_word_links("ab", "cd", "9:9-0:1").unwrap_err();
        assert_eq!(err, AlignmentError::OffsetOutOfRange { offset: 9, len: 2 });
    }

    #[test]
    fn test_word_alignment_string_round_trip_shape() {
        let links = vec![AlignmentLink::new(0, 0), AlignmentLink::new(2, 1)];
        assert_eq!(word_alignment_string(&links), "0-0 2-1");
        assert_eq!(word_alignment_string(&[]), "");
    }
}
