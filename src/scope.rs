//! Selection window: restricting a run to a source-line range.
//!
//! A window is an optional pair of 1-based line bounds. Nodes whose source
//! span lies entirely outside the window are passed through unmodified by
//! every rule; children of a partially-covered parent are still visited, so
//! users can restrict formatting to an edited line range without re-running
//! the whole pipeline on the rest of the file.

/// Optional line range limiting which nodes a run may modify.
///
/// Either bound may be absent: `start_line` alone means "from this line to
/// the end of the document", `end_line` alone means "from the top down to
/// this line". Newly fabricated nodes carry no source lines and are always
/// in scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionWindow {
    start_line: Option<usize>,
    end_line: Option<usize>,
}

impl SelectionWindow {
    /// Create a window from optional 1-based bounds.
    #[must_use]
    pub fn new(start_line: Option<usize>, end_line: Option<usize>) -> Self {
        SelectionWindow {
            start_line,
            end_line,
        }
    }

    /// Window covering the whole document.
    #[must_use]
    pub fn unbounded() -> Self {
        SelectionWindow::default()
    }

    /// True when no bound is configured.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.start_line.is_none() && self.end_line.is_none()
    }

    /// Whether a node with the given `(start, end)` line span may be
    /// modified. A `None` span (synthetic node) is always in scope; a real
    /// span is in scope when it intersects the window.
    #[must_use]
    pub fn is_in_scope(&self, span: Option<(usize, usize)>) -> bool {
        let Some((start, end)) = span else {
            return true;
        };
        if let Some(from) = self.start_line {
            if end < from {
                return false;
            }
        }
        if let Some(to) = self.end_line {
            if start > to {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_window_covers_everything() {
        let window = SelectionWindow::unbounded();
        assert!(window.is_unbounded());
        assert!(window.is_in_scope(Some((1, 1))));
        assert!(window.is_in_scope(Some((500, 900))));
        assert!(window.is_in_scope(None));
    }

    #[test]
    fn test_span_below_window_is_out_of_scope() {
        let window = SelectionWindow::new(Some(10), Some(20));
        assert!(!window.is_in_scope(Some((1, 9))));
        assert!(window.is_in_scope(Some((1, 10))));
    }

    #[test]
    fn test_span_above_window_is_out_of_scope() {
        let window = SelectionWindow::new(Some(10), Some(20));
        assert!(!window.is_in_scope(Some((21, 30))));
        assert!(window.is_in_scope(Some((20, 30))));
    }

    #[test]
    fn test_overlapping_span_is_in_scope() {
        let window = SelectionWindow::new(Some(10), Some(20));
        assert!(window.is_in_scope(Some((5, 15))));
        assert!(window.is_in_scope(Some((15, 25))));
        assert!(window.is_in_scope(Some((5, 25))));
    }

    #[test]
    fn test_half_open_windows() {
        let from_ten = SelectionWindow::new(Some(10), None);
        assert!(!from_ten.is_in_scope(Some((1, 9))));
        assert!(from_ten.is_in_scope(Some((10, 999))));

        let up_to_ten = SelectionWindow::new(None, Some(10));
        assert!(up_to_ten.is_in_scope(Some((1, 9))));
        assert!(!up_to_ten.is_in_scope(Some((11, 12))));
    }

    #[test]
    fn test_synthetic_span_always_in_scope() {
        let window = SelectionWindow::new(Some(10), Some(20));
        assert!(window.is_in_scope(None));
    }
}
