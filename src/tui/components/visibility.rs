//! # Visibility Trigger
//!
//! The terminal stand-in for an intersection observer. The picker reports,
//! after every draw, how much of the sentinel row is inside the list
//! viewport; the trigger answers whether that observation should request
//! the next page.
//!
//! It fires once per transition from below the threshold to at-or-above it.
//! A sentinel that stays on screen does not fire again until it either
//! leaves the viewport or moves to a new row (a page was appended, which is
//! a fresh element as far as the observer is concerned).

/// Share of a row span that lies inside the viewport, in `0.0..=1.0`.
///
/// `row` / `row_height` describe the observed element, `offset` / `height`
/// the visible window, all in list rows.
pub fn visible_fraction(row: usize, row_height: usize, offset: usize, height: usize) -> f32 {
    if row_height == 0 {
        return 0.0;
    }
    let start = row.max(offset);
    let end = (row + row_height).min(offset + height);
    if end <= start {
        return 0.0;
    }
    (end - start) as f32 / row_height as f32
}

#[derive(Debug, Clone)]
pub struct VisibilityTrigger {
    threshold: f32,
    target: Option<usize>,
    was_visible: bool,
}

impl VisibilityTrigger {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(f32::EPSILON, 1.0),
            target: None,
            was_visible: false,
        }
    }

    /// Records one observation of the sentinel at row `target`.
    /// Returns true when the next page should be requested.
    pub fn observe(&mut self, target: usize, fraction: f32) -> bool {
        if self.target != Some(target) {
            self.target = Some(target);
            self.was_visible = false;
        }
        let visible = fraction >= self.threshold;
        let fire = visible && !self.was_visible;
        self.was_visible = visible;
        fire
    }

    /// Forgets the last observation, e.g. after the list was reset.
    pub fn reset(&mut self) {
        self.target = None;
        self.was_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_fraction() {
        // Fully inside.
        assert_eq!(visible_fraction(3, 1, 0, 10), 1.0);
        // Just below the viewport.
        assert_eq!(visible_fraction(10, 1, 0, 10), 0.0);
        // Above the viewport.
        assert_eq!(visible_fraction(2, 1, 5, 10), 0.0);
        // Half of a two-row element.
        assert_eq!(visible_fraction(9, 2, 0, 10), 0.5);
        assert_eq!(visible_fraction(0, 0, 0, 10), 0.0);
    }

    #[test]
    fn test_fires_once_while_continuously_visible() {
        let mut trigger = VisibilityTrigger::new(1.0);
        assert!(trigger.observe(5, 1.0));
        assert!(!trigger.observe(5, 1.0));
        assert!(!trigger.observe(5, 1.0));
    }

    #[test]
    fn test_rearms_after_leaving_viewport() {
        let mut trigger = VisibilityTrigger::new(1.0);
        assert!(!trigger.observe(5, 0.0));
        assert!(trigger.observe(5, 1.0));
        assert!(!trigger.observe(5, 0.5));
        assert!(trigger.observe(5, 1.0));
    }

    #[test]
    fn test_moved_sentinel_is_a_new_target() {
        let mut trigger = VisibilityTrigger::new(1.0);
        assert!(trigger.observe(5, 1.0));
        assert!(trigger.observe(10, 1.0));
    }

    #[test]
    fn test_partial_threshold() {
        let mut trigger = VisibilityTrigger::new(0.5);
        assert!(!trigger.observe(9, 0.25));
        assert!(trigger.observe(9, 0.5));
    }

    #[test]
    fn test_reset_rearms() {
        let mut trigger = VisibilityTrigger::new(1.0);
        assert!(trigger.observe(5, 1.0));
        trigger.reset();
        assert!(trigger.observe(5, 1.0));
    }

    #[test]
    fn test_threshold_is_clamped() {
        assert_eq!(VisibilityTrigger::new(4.0).threshold, 1.0);
        assert!(VisibilityTrigger::new(0.0).threshold > 0.0);
    }
}
