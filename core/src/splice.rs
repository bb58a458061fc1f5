//! Marker-delimited document splicing.
//!
//! The document is a sequence of lines containing one start-marker line and
//! one end-marker line. The content strictly between them belongs to the
//! generator; everything outside is preserved byte for byte.

/// Literal sentinel strings matched as substrings of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub start: String,
    pub end: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            start: "<!-- TIME-TOGETHER:START -->".to_string(),
            end: "<!-- TIME-TOGETHER:END -->".to_string(),
        }
    }
}

/// Result of a splice: the new document text and whether it differs from
/// the input. `changed` is the sole gate for every downstream side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spliced {
    pub text: String,
    pub changed: bool,
}

/// Replace the content strictly between the markers with `block`.
///
/// The first line containing each marker is honored; a document with
/// duplicate markers is outside the contract. When either marker is missing
/// or the end marker does not come after the start marker, a fresh marker
/// pair wrapping `block` is appended instead, so the next run takes the
/// valid path.
#[must_use]
pub fn splice(original: &str, block: &str, markers: &Markers) -> Spliced {
    let lines: Vec<&str> = original.split_inclusive('\n').collect();
    let start = lines.iter().position(|line| line.contains(&markers.start));
    let end = lines.iter().position(|line| line.contains(&markers.end));

    let text = match (start, end) {
        (Some(start), Some(end)) if start < end => {
            let mut out = String::with_capacity(original.len() + block.len());
            for line in &lines[..=start] {
                out.push_str(line);
            }
            out.push_str(block);
            for line in &lines[end..] {
                out.push_str(line);
            }
            out
        }
        _ => append_with_markers(original, block, markers),
    };

    let changed = text != original;
    Spliced { text, changed }
}

fn append_with_markers(original: &str, block: &str, markers: &Markers) -> String {
    let mut out = String::with_capacity(
        original.len() + block.len() + markers.start.len() + markers.end.len() + 3,
    );
    out.push_str(original);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&markers.start);
    out.push('\n');
    out.push_str(block);
    out.push_str(&markers.end);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "A\n<!-- TIME-TOGETHER:START -->\nOLD\n<!-- TIME-TOGETHER:END -->\nB\n";

    fn assert_unique_markers(doc: &str, markers: &Markers) {
        assert_eq!(doc.matches(&markers.start).count(), 1);
        assert_eq!(doc.matches(&markers.end).count(), 1);
    }

    #[test]
    fn replaces_content_between_markers() {
        let markers = Markers::default();
        assert_unique_markers(DOC, &markers);
        let spliced = splice(DOC, "NEW\n", &markers);
        assert_eq!(
            spliced.text,
            "A\n<!-- TIME-TOGETHER:START -->\nNEW\n<!-- TIME-TOGETHER:END -->\nB\n"
        );
        assert!(spliced.changed);
    }

    #[test]
    fn second_run_is_a_no_op() {
        let markers = Markers::default();
        let first = splice(DOC, "NEW\n", &markers);
        let second = splice(&first.text, "NEW\n", &markers);
        assert_eq!(second.text, first.text);
        assert!(!second.changed);
    }

    #[test]
    fn unchanged_content_signals_no_change() {
        let markers = Markers::default();
        let spliced = splice(DOC, "OLD\n", &markers);
        assert_eq!(spliced.text, DOC);
        assert!(!spliced.changed);
    }

    #[test]
    fn missing_markers_append_a_fresh_pair() {
        let markers = Markers::default();
        let spliced = splice("# Title\n", "NEW\n", &markers);
        assert_eq!(
            spliced.text,
            "# Title\n<!-- TIME-TOGETHER:START -->\nNEW\n<!-- TIME-TOGETHER:END -->\n"
        );
        assert!(spliced.changed);

        // The appended pair makes the following run idempotent.
        let again = splice(&spliced.text, "NEW\n", &markers);
        assert_eq!(again.text, spliced.text);
        assert!(!again.changed);
    }

    #[test]
    fn empty_document_bootstraps_the_section() {
        let markers = Markers::default();
        let spliced = splice("", "NEW\n", &markers);
        assert_eq!(
            spliced.text,
            "<!-- TIME-TOGETHER:START -->\nNEW\n<!-- TIME-TOGETHER:END -->\n"
        );
    }

    #[test]
    fn document_without_trailing_newline_gets_one_before_the_pair() {
        let markers = Markers::default();
        let spliced = splice("tail", "NEW\n", &markers);
        assert!(spliced.text.starts_with("tail\n<!-- TIME-TOGETHER:START -->\n"));
    }

    #[test]
    fn out_of_order_markers_fall_back_to_append() {
        let markers = Markers::default();
        let doc = "<!-- TIME-TOGETHER:END -->\n<!-- TIME-TOGETHER:START -->\n";
        let spliced = splice(doc, "NEW\n", &markers);
        assert!(spliced.text.starts_with(doc));
        assert!(spliced.text.ends_with(
            "<!-- TIME-TOGETHER:START -->\nNEW\n<!-- TIME-TOGETHER:END -->\n"
        ));
    }

    #[test]
    fn markers_match_as_substrings_of_a_line() {
        let markers = Markers::default();
        let doc = "A\nprefix <!-- TIME-TOGETHER:START --> suffix\nOLD\n<!-- TIME-TOGETHER:END -->\n";
        let spliced = splice(doc, "NEW\n", &markers);
        assert_eq!(
            spliced.text,
            "A\nprefix <!-- TIME-TOGETHER:START --> suffix\nNEW\n<!-- TIME-TOGETHER:END -->\n"
        );
    }
}
