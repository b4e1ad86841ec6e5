use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::document::ParallelSentence;
use crate::ui::edit_field::EditField;
use crate::ui::theme::Theme;

/// Rows between the source and target word rows, in which the alignment
/// connectors are drawn.
pub const CONNECTOR_ROWS: u16 = 4;

/// Left indent of the word rows and the edit field inside the border.
const ROW_INDENT: u16 = 1;

/// What a terminal cell inside the panel belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hit {
    SourceWord(usize),
    TargetWord(usize),
    EditField,
    Panel,
}

/// Cell geometry of one rendered sentence panel: the bounding box of every
/// word token, the connector band, and the edit field. Computed the same
/// way by the renderer and by the host's pointer hit-testing.
#[derive(Clone, Debug)]
pub struct PanelLayout {
    pub panel: Rect,
    pub source_boxes: Vec<Rect>,
    pub target_boxes: Vec<Rect>,
    pub connector: Rect,
    pub edit: Rect,
}

impl PanelLayout {
    pub fn compute(sentence: &ParallelSentence, area: Rect) -> Self {
        let inner = Rect {
            x: area.x.saturating_add(1),
            y: area.y.saturating_add(1),
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(2),
        };

        let source_y = inner.y;
        let connector = Rect::new(
            inner.x,
            source_y.saturating_add(1),
            inner.width,
            CONNECTOR_ROWS,
        );
        let target_y = connector.y.saturating_add(connector.height);
        let edit_y = target_y.saturating_add(2);

        let source_boxes = word_boxes(&sentence.source_words, inner, source_y);
        let target_boxes = word_boxes(&sentence.target_words, inner, target_y);

        let edit = Rect::new(
            inner.x.saturating_add(ROW_INDENT),
            edit_y,
            inner.width.saturating_sub(ROW_INDENT),
            1,
        );

        Self {
            panel: area,
            source_boxes,
            target_boxes,
            connector,
            edit,
        }
    }

    /// One straight segment per alignment link: from the bottom-center of
    /// the source token's box to the top-center of the target token's box,
    /// in absolute cell coordinates `((x1, y1), (x2, y2))`.
    ///
    /// A link with an out-of-range index panics here: malformed alignment
    /// data is the producing side's bug and propagates to the shell.
    pub fn alignment_segments(&self, sentence: &ParallelSentence) -> Vec<((f64, f64), (f64, f64))> {
        sentence
            .alignment
            .iter()
            .map(|link| {
                let src = self.source_boxes[link.source];
                let tgt = self.target_boxes[link.target];
                let x1 = src.x as f64 + src.width as f64 / 2.0;
                let y1 = (src.y + src.height) as f64;
                let x2 = tgt.x as f64 + tgt.width as f64 / 2.0;
                let y2 = tgt.y as f64;
                ((x1, y1), (x2, y2))
            })
            .collect()
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<Hit> {
        let pos = ratatui::layout::Position::new(column, row);
        if self.edit.contains(pos) {
            return Some(Hit::EditField);
        }
        for (i, rect) in self.source_boxes.iter().enumerate() {
            if rect.contains(pos) {
                return Some(Hit::SourceWord(i));
            }
        }
        for (i, rect) in self.target_boxes.iter().enumerate() {
            if rect.contains(pos) {
                return Some(Hit::TargetWord(i));
            }
        }
        if self.panel.contains(pos) {
            return Some(Hit::Panel);
        }
        None
    }
}

/// Lay words out left-to-right with single-space gaps, clipped at the
/// panel's right edge. Clipped-away words get zero-width boxes so indices
/// stay aligned with the word rows.
fn word_boxes(words: &[String], inner: Rect, y: u16) -> Vec<Rect> {
    let right = inner.x.saturating_add(inner.width);
    let mut x = inner.x.saturating_add(ROW_INDENT);
    let mut boxes = Vec::with_capacity(words.len());

    for word in words {
        let want = word.chars().count() as u16;
        let width = want.min(right.saturating_sub(x));
        boxes.push(Rect::new(x.min(right), y, width, 1));
        x = x.saturating_add(want).saturating_add(1);
    }
    boxes
}

pub struct SentencePanel<'a> {
    sentence: &'a ParallelSentence,
    edit: &'a EditField,
    theme: &'a Theme,
    title: String,
    hover: Option<Hit>,
}

impl<'a> SentencePanel<'a> {
    pub fn new(
        sentence: &'a ParallelSentence,
        edit: &'a EditField,
        theme: &'a Theme,
        title: String,
    ) -> Self {
        Self {
            sentence,
            edit,
            theme,
            title,
            hover: None,
        }
    }

    pub fn hover(mut self, hover: Option<Hit>) -> Self {
        self.hover = hover;
        self
    }

    fn word_row<'s>(
        &self,
        words: &'s [String],
        base: Style,
        hovered: impl Fn(usize) -> bool,
    ) -> Line<'s> {
        let colors = &self.theme.colors;
        let mut spans: Vec<Span> = Vec::with_capacity(words.len() * 2);
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            let style = if hovered(i) {
                Style::default()
                    .fg(colors.word_hover())
                    .add_modifier(Modifier::BOLD)
            } else {
                base
            };
            spans.push(Span::styled(word.as_str(), style));
        }
        Line::from(spans)
    }
}

impl Widget for SentencePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let layout = PanelLayout::compute(self.sentence, area);

        // The edit field always owns keyboard input while the panel shows.
        let block = Block::bordered()
            .title(self.title.clone())
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        block.render(area, buf);

        // Source row
        let source_line = self.word_row(
            &self.sentence.source_words,
            Style::default().fg(colors.source_word()),
            |i| self.hover == Some(Hit::SourceWord(i)),
        );
        if let Some(first) = layout.source_boxes.first() {
            // Clamp to the inner area so the row never paints over the border.
            let width = layout.connector.right().saturating_sub(first.x);
            let row = Rect::new(first.x, first.y, width, 1);
            Paragraph::new(source_line).render(row, buf);
        }

        // Connector band: one Braille-resolution segment per link, drawn
        // from each source token's bottom-center to its aligned target
        // token's top-center.
        let segments = layout.alignment_segments(self.sentence);
        let band = layout.connector;
        if band.height > 0 && band.width > 0 {
            let y_top = band.y as f64;
            let y_bottom = (band.y + band.height) as f64;
            let line_color = colors.alignment_line();
            let canvas = Canvas::default()
                .marker(Marker::Braille)
                .x_bounds([band.x as f64, (band.x + band.width) as f64])
                .y_bounds([0.0, band.height as f64])
                .paint(|ctx| {
                    for ((x1, y1), (x2, y2)) in &segments {
                        // Screen rows grow downward; canvas y grows upward.
                        ctx.draw(&CanvasLine {
                            x1: *x1,
                            y1: y_bottom - y1.max(y_top),
                            x2: *x2,
                            y2: y_bottom - y2.min(y_bottom),
                            color: line_color,
                        });
                    }
                });
            canvas.render(band, buf);
        }

        // Target row
        let target_line = self.word_row(
            &self.sentence.target_words,
            Style::default().fg(colors.target_word()),
            |i| self.hover == Some(Hit::TargetWord(i)),
        );
        if let Some(first) = layout.target_boxes.first() {
            let width = layout.connector.right().saturating_sub(first.x);
            let row = Rect::new(first.x, first.y, width, 1);
            Paragraph::new(target_line).render(row, buf);
        }

        // Edit field
        let (before, at, after) = self.edit.render_parts();
        let text_style = Style::default().fg(colors.edit_text());
        let cursor_style = Style::default()
            .fg(colors.edit_cursor_fg())
            .bg(colors.edit_cursor_bg());
        let hover_field = self.hover == Some(Hit::EditField);
        let marker_style = Style::default().fg(if hover_field {
            colors.word_hover()
        } else {
            colors.accent()
        });

        let mut spans = vec![Span::styled("> ", marker_style), Span::styled(before, text_style)];
        match at {
            Some(ch) => {
                spans.push(Span::styled(ch.to_string(), cursor_style));
                spans.push(Span::styled(after, text_style));
            }
            None => spans.push(Span::styled(" ", cursor_style)),
        }
        let edit_x = layout.edit.x.saturating_sub(2).max(layout.panel.x + 1);
        let edit_row = Rect::new(
            edit_x,
            layout.edit.y,
            layout.connector.right().saturating_sub(edit_x),
            1,
        );
        Paragraph::new(Line::from(spans)).render(edit_row, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::AlignmentLink;

    fn sentence() -> ParallelSentence {
        ParallelSentence::new(
            0,
            vec!["the".to_string(), "cat".to_string()],
            vec!["le".to_string(), "chat".to_string()],
            vec![AlignmentLink::new(0, 0), AlignmentLink::new(1, 1)],
            String::new(),
        )
    }

    fn area() -> Rect {
        Rect::new(0, 0, 40, 12)
    }

    #[test]
    fn test_one_segment_per_link() {
        let s = sentence();
        let layout = PanelLayout::compute(&s, area());
        let segments = layout.alignment_segments(&s);
        assert_eq!(segments.len(), s.alignment.len());
    }

    #[test]
    fn test_segment_endpoints_are_box_centers() {
        let s = sentence();
        let layout = PanelLayout::compute(&s, area());
        let segments = layout.alignment_segments(&s);

        // "the" occupies columns 2..5 (border + indent), center 3.5, row 1;
        // its segment starts at the box's bottom edge (row 2).
        let src = layout.source_boxes[0];
        let ((x1, y1), (x2, y2)) = segments[0];
        assert_eq!(x1, src.x as f64 + src.width as f64 / 2.0);
        assert_eq!(y1, (src.y + src.height) as f64);

        // "le" top-center.
        let tgt = layout.target_boxes[0];
        assert_eq!(x2, tgt.x as f64 + tgt.width as f64 / 2.0);
        assert_eq!(y2, tgt.y as f64);
    }

    #[test]
    fn test_rows_are_separated_by_connector_band() {
        let s = sentence();
        let layout = PanelLayout::compute(&s, area());
        let source_y = layout.source_boxes[0].y;
        let target_y = layout.target_boxes[0].y;
        assert_eq!(target_y - source_y, 1 + CONNECTOR_ROWS);
        assert!(layout.edit.y > target_y);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_link_panics_at_segment_time() {
        let mut s = sentence();
        s.alignment.push(AlignmentLink::new(7, 0));
        let layout = PanelLayout::compute(&s, area());
        let _ = layout.alignment_segments(&s);
    }

    #[test]
    fn test_hit_test_maps_cells_to_widgets() {
        let s = sentence();
        let layout = PanelLayout::compute(&s, area());

        let src = layout.source_boxes[1];
        assert_eq!(layout.hit_test(src.x, src.y), Some(Hit::SourceWord(1)));

        let tgt = layout.target_boxes[0];
        assert_eq!(layout.hit_test(tgt.x, tgt.y), Some(Hit::TargetWord(0)));

        let edit = layout.edit;
        assert_eq!(layout.hit_test(edit.x + 1, edit.y), Some(Hit::EditField));

        // Inside the border but on no word: the panel itself.
        assert_eq!(layout.hit_test(0, 0), Some(Hit::Panel));

        // Outside the panel entirely.
        assert_eq!(layout.hit_test(39, 39), None);
    }

    #[test]
    fn test_clipping_keeps_box_indices_stable() {
        let s = ParallelSentence::new(
            0,
            vec!["a".repeat(30), "b".repeat(30), "c".repeat(30)],
            vec!["x".to_string()],
            Vec::new(),
            String::new(),
        );
        let layout = PanelLayout::compute(&s, area());
        assert_eq!(layout.source_boxes.len(), 3);
        // The last word is clipped to zero width, never out of bounds.
        assert_eq!(layout.source_boxes[2].width, 0);
    }

    #[test]
    fn test_full_rows_leave_the_right_border_intact() {
        let s = ParallelSentence::new(
            0,
            vec!["a".repeat(60)],
            vec!["b".repeat(60)],
            Vec::new(),
            String::new(),
        );
        let edit = EditField::new(&"c".repeat(60));
        let theme = Theme::default();
        let panel = SentencePanel::new(&s, &edit, &theme, " t ".to_string());
        let mut buf = Buffer::empty(area());
        panel.render(area(), &mut buf);

        let layout = PanelLayout::compute(&s, area());
        let source_y = layout.source_boxes[0].y;
        let target_y = layout.target_boxes[0].y;
        for y in [source_y, target_y, layout.edit.y] {
            assert_eq!(buf[(39, y)].symbol(), "│", "border overpainted at row {y}");
        }
    }

    #[test]
    fn test_render_smoke() {
        let s = sentence();
        let edit = EditField::new("le chat");
        let theme = Theme::default();
        let panel = SentencePanel::new(&s, &edit, &theme, " 1/1 ".to_string());
        let mut buf = Buffer::empty(area());
        panel.render(area(), &mut buf);
        // Words appear on their computed rows.
        let row1: String = (0..40).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row1.contains("the cat"));
        let row6: String = (0..40)
            .map(|x| buf[(x, (1 + 1 + CONNECTOR_ROWS))].symbol().to_string())
            .collect();
        assert!(row6.contains("le chat"));
    }
}
