//! # Text Measurement
//!
//! The engine never shapes text itself. It asks a [`TextMeasurer`] to break a
//! run into lines for a given width and uses the returned line heights. The
//! fit estimator and the emitter call the same measurer with the same width,
//! which is what keeps the trial pass and the committed pass in agreement.
//!
//! [`FixedMetrics`] is the built-in measurer: every character advances by a
//! fixed fraction of the em, and lines wrap greedily at UAX#14 break
//! opportunities. Real font metrics plug in through the trait.

use crate::model::TextRun;
use unicode_linebreak::{linebreaks, BreakOpportunity};

/// A line of text after line-breaking.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredLine {
    /// The text on this line, without trailing whitespace.
    pub text: String,
    /// Total advance width of the line.
    pub width: f64,
    /// Vertical space the line occupies.
    pub height: f64,
}

/// Breaks text runs into lines. Implementations must be deterministic:
/// the same run and width must always produce the same lines.
pub trait TextMeasurer {
    fn break_lines(&self, run: &TextRun, max_width: f64) -> Vec<MeasuredLine>;
}

/// Uniform-advance metrics: each character is `advance_em * font_size` wide.
#[derive(Debug, Clone, Copy)]
pub struct FixedMetrics {
    pub advance_em: f64,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self { advance_em: 0.5 }
    }
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

impl FixedMetrics {
    fn measure(&self, text: &str, font_size: f64) -> f64 {
        text.chars().filter(|c| !is_newline(*c)).count() as f64 * self.advance_em * font_size
    }

    fn finish_line(&self, current: &mut String, run: &TextRun) -> MeasuredLine {
        let text = current.trim_end().to_string();
        current.clear();
        MeasuredLine {
            width: self.measure(&text, run.font_size),
            text,
            height: run.line_advance(),
        }
    }
}

impl TextMeasurer for FixedMetrics {
    fn break_lines(&self, run: &TextRun, max_width: f64) -> Vec<MeasuredLine> {
        let mut lines = Vec::new();
        if run.content.is_empty() {
            return lines;
        }

        let mut current = String::new();
        let mut current_width = 0.0;
        let mut start = 0;

        for (end, opportunity) in linebreaks(&run.content) {
            let segment = &run.content[start..end];
            start = end;

            let body = segment.trim_end_matches(is_newline);
            // Trailing spaces may hang past the margin.
            let visible_width = self.measure(body.trim_end(), run.font_size);
            if !current.is_empty() && current_width + visible_width > max_width {
                lines.push(self.finish_line(&mut current, run));
                current_width = 0.0;
            }
            current.push_str(body);
            current_width += self.measure(body, run.font_size);

            if matches!(opportunity, BreakOpportunity::Mandatory) {
                lines.push(self.finish_line(&mut current, run));
                current_width = 0.0;
            }
        }

        if !current.is_empty() {
            lines.push(self.finish_line(&mut current, run));
        }

        lines
    }
}
