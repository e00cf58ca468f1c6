//! Re-rooting ("zoom") with a back-stack.
//!
//! `None` as a root means "the default root". It is pushed onto the stack
//! like any other value, so zooming all the way out lands back on the default
//! root even if the data's default root changes in between.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZoomState {
    current_root: Option<String>,
    back_stack: Vec<Option<String>>,
}

impl ZoomState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicitly zoomed root, or `None` when showing the default root.
    pub fn current_root(&self) -> Option<&str> {
        self.current_root.as_deref()
    }

    pub fn back_stack(&self) -> &[Option<String>] {
        &self.back_stack
    }

    pub fn can_zoom_out(&self) -> bool {
        !self.back_stack.is_empty()
    }

    /// The root actually displayed, given the data's default root.
    pub fn effective_root<'a>(&'a self, default_root: Option<&'a str>) -> Option<&'a str> {
        self.current_root().or(default_root)
    }

    /// Re-root at `target`. Returns `false` (and changes nothing) when
    /// `target` is already the displayed root.
    pub fn zoom_in(&mut self, target: &str, default_root: Option<&str>) -> bool {
        if self.effective_root(default_root) == Some(target) {
            return false;
        }
        let previous = self.current_root.replace(target.to_string());
        self.back_stack.push(previous);
        true
    }

    /// Return to the previous root. Returns `false` when there is nowhere to go.
    pub fn zoom_out(&mut self) -> bool {
        match self.back_stack.pop() {
            Some(previous) => {
                self.current_root = previous;
                true
            }
            None => false,
        }
    }

    /// Back to the default root with an empty history.
    pub fn reset(&mut self) {
        self.current_root = None;
        self.back_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_in_then_out_restores_previous_root() {
        let mut zoom = ZoomState::new();
        assert!(zoom.zoom_in("2", Some("1")));
        assert_eq!(zoom.current_root(), Some("2"));
        assert_eq!(zoom.back_stack(), &[None]);

        assert!(zoom.zoom_out());
        assert_eq!(zoom.current_root(), None);
        assert!(!zoom.can_zoom_out());
    }

    #[test]
    fn zooming_into_the_displayed_root_is_rejected() {
        let mut zoom = ZoomState::new();
        assert!(!zoom.zoom_in("1", Some("1")));
        assert_eq!(zoom, ZoomState::new());

        assert!(zoom.zoom_in("2", Some("1")));
        assert!(!zoom.zoom_in("2", Some("1")));
        assert_eq!(zoom.back_stack().len(), 1);
    }

    #[test]
    fn zoom_out_on_empty_stack_is_a_no_op() {
        let mut zoom = ZoomState::new();
        assert!(!zoom.zoom_out());
        assert_eq!(zoom, ZoomState::new());
    }

    #[test]
    fn chains_unwind_in_reverse_order() {
        let mut zoom = ZoomState::new();
        for target in ["2", "4", "7"] {
            assert!(zoom.zoom_in(target, Some("1")));
        }
        assert_eq!(zoom.effective_root(Some("1")), Some("7"));

        assert!(zoom.zoom_out());
        assert_eq!(zoom.current_root(), Some("4"));
        assert!(zoom.zoom_out());
        assert_eq!(zoom.current_root(), Some("2"));
        assert!(zoom.zoom_out());
        assert_eq!(zoom, ZoomState::new());
    }

    #[test]
    fn reset_clears_history() {
        let mut zoom = ZoomState::new();
        zoom.zoom_in("2", None);
        zoom.zoom_in("3", None);
        zoom.reset();
        assert_eq!(zoom, ZoomState::new());
    }
}
