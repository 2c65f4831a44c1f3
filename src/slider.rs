//! Discrete tier slider
//!
//! Maps a continuous pointer position along a track, or discrete key steps,
//! onto one of a fixed number of tiers. The index is clamped on every write,
//! so no input can push it out of `0..tier_count`.

use ratatui::layout::Rect;
use thiserror::Error;

/// Default starting tier (the middle of five)
pub const DEFAULT_INDEX: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SliderError {
    #[error("a slider needs at least one tier")]
    NoTiers,
}

/// Horizontal geometry of the slider track, in the same units as pointer x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Track {
    pub left: f64,
    pub width: f64,
}

impl Track {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Track covering a terminal area, one column per cell.
    ///
    /// The first and last columns are the two ends, so the usable width is
    /// one less than the cell count. A one-cell area has zero width.
    pub fn from_rect(area: Rect) -> Self {
        Self::new(area.x as f64, area.width.saturating_sub(1) as f64)
    }

    /// False while the track has not been laid out yet (zero or bogus width)
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.left.is_finite() && self.width > 0.0
    }

    /// Pointer position as a fraction of the track, clamped to `[0, 1]`
    pub fn fraction(&self, client_x: f64) -> Option<f64> {
        if !self.is_measurable() || !client_x.is_finite() {
            return None;
        }
        Some(((client_x - self.left) / self.width).clamp(0.0, 1.0))
    }
}

/// Keyboard step direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Back,
    Forward,
}

impl Step {
    pub fn delta(self) -> isize {
        match self {
            Step::Back => -1,
            Step::Forward => 1,
        }
    }
}

/// Drag gesture state. The captured track is what moves are resolved against
/// until the gesture ends, wherever the pointer wanders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { track: Track },
}

/// Result of feeding an input to the slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Index moved to the contained value
    Changed(usize),
    /// Input was valid but the index already had this value
    Unchanged(usize),
    /// Track had no usable width; nothing happened
    MeasurementUnavailable,
    /// Pointer event that does not apply in the current drag state
    Ignored,
}

impl Outcome {
    pub fn changed(self) -> bool {
        matches!(self, Outcome::Changed(_))
    }
}

#[derive(Debug, Clone)]
pub struct TierSlider {
    tier_count: usize,
    index: usize,
    drag: DragState,
}

impl TierSlider {
    pub fn new(tier_count: usize, initial: usize) -> Result<Self, SliderError> {
        if tier_count == 0 {
            return Err(SliderError::NoTiers);
        }
        Ok(Self {
            tier_count,
            index: initial.min(tier_count - 1),
            drag: DragState::Idle,
        })
    }

    pub fn tier_count(&self) -> usize {
        self.tier_count
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    fn max_index(&self) -> usize {
        self.tier_count - 1
    }

    /// Nearest tier for a pointer at `client_x`, or `None` if the track
    /// cannot be measured
    pub fn position_to_index(&self, client_x: f64, track: Track) -> Option<usize> {
        let fraction = track.fraction(client_x)?;
        let scaled = (fraction * self.max_index() as f64).round() as usize;
        Some(scaled.min(self.max_index()))
    }

    /// Index one step away from the current one, absorbed at both ends
    pub fn step_index(&self, step: Step) -> usize {
        self.index
            .saturating_add_signed(step.delta())
            .min(self.max_index())
    }

    /// The only mutator. Out-of-range values are clamped.
    pub fn set_index(&mut self, new_index: usize) -> Outcome {
        let clamped = new_index.min(self.max_index());
        if clamped == self.index {
            return Outcome::Unchanged(clamped);
        }
        tracing::debug!(from = self.index, to = clamped, "tier changed");
        self.index = clamped;
        Outcome::Changed(clamped)
    }

    /// Apply a pointer position against `track`
    pub fn apply_position(&mut self, client_x: f64, track: Track) -> Outcome {
        match self.position_to_index(client_x, track) {
            Some(index) => self.set_index(index),
            None => {
                tracing::trace!(?track, "slider track not measurable, dropping input");
                Outcome::MeasurementUnavailable
            }
        }
    }

    pub fn step(&mut self, step: Step) -> Outcome {
        let next = self.step_index(step);
        self.set_index(next)
    }

    /// Fraction of the track covered by the fill, for rendering
    pub fn fill_fraction(&self) -> f64 {
        if self.tier_count < 2 {
            return 0.0;
        }
        self.index as f64 / self.max_index() as f64
    }

    /// Start (or restart) a drag gesture and jump to the pressed position
    pub fn pointer_down(&mut self, client_x: f64, track: Track) -> Outcome {
        if !track.is_measurable() {
            tracing::trace!(?track, "pointer down on unmeasured track");
            return Outcome::MeasurementUnavailable;
        }
        self.drag = DragState::Dragging { track };
        self.apply_position(client_x, track)
    }

    pub fn pointer_move(&mut self, client_x: f64) -> Outcome {
        match self.drag {
            DragState::Dragging { track } => self.apply_position(client_x, track),
            DragState::Idle => Outcome::Ignored,
        }
    }

    pub fn pointer_up(&mut self) -> Outcome {
        self.release()
    }

    /// Interrupted gesture. Same as `pointer_up`: the last index stays.
    pub fn pointer_cancel(&mut self) -> Outcome {
        self.release()
    }

    /// Drop the capture. Safe to call in any state.
    pub fn release(&mut self) -> Outcome {
        match self.drag {
            DragState::Dragging { .. } => {
                self.drag = DragState::Idle;
                Outcome::Unchanged(self.index)
            }
            DragState::Idle => Outcome::Ignored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five() -> TierSlider {
        TierSlider::new(5, DEFAULT_INDEX).unwrap()
    }

    fn track() -> Track {
        Track::new(100.0, 400.0)
    }

    #[test]
    fn test_rejects_zero_tiers() {
        assert_eq!(TierSlider::new(0, 0).unwrap_err(), SliderError::NoTiers);
    }

    #[test]
    fn test_initial_index_is_clamped() {
        let slider = TierSlider::new(5, 42).unwrap();
        assert_eq!(slider.index(), 4);
    }

    #[test]
    fn test_every_fraction_maps_in_range() {
        for tier_count in 2..=9 {
            let slider = TierSlider::new(tier_count, 0).unwrap();
            let t = Track::new(0.0, 1.0);
            for step in 0..=1000 {
                let x = step as f64 / 1000.0;
                let index = slider.position_to_index(x, t).unwrap();
                assert!(index < tier_count, "{} out of range for {}", index, tier_count);
            }
        }
    }

    #[test]
    fn test_outside_track_saturates() {
        let slider = five();
        assert_eq!(slider.position_to_index(-1000.0, track()), Some(0));
        assert_eq!(slider.position_to_index(99.0, track()), Some(0));
        assert_eq!(slider.position_to_index(501.0, track()), Some(4));
        assert_eq!(slider.position_to_index(1e9, track()), Some(4));
    }

    #[test]
    fn test_unmeasurable_track_is_noop() {
        let mut slider = five();
        let flat = Track::new(100.0, 0.0);
        assert_eq!(slider.position_to_index(150.0, flat), None);
        assert_eq!(slider.apply_position(150.0, flat), Outcome::MeasurementUnavailable);
        assert_eq!(slider.pointer_down(150.0, flat), Outcome::MeasurementUnavailable);
        assert_eq!(slider.index(), DEFAULT_INDEX);
        assert!(!slider.is_dragging());

        let nan = Track::new(0.0, f64::NAN);
        assert_eq!(slider.position_to_index(1.0, nan), None);
    }

    #[test]
    fn test_step_absorbs_at_bounds() {
        let mut slider = five();
        slider.set_index(4);
        assert_eq!(slider.step_index(Step::Forward), 4);
        assert_eq!(slider.step(Step::Forward), Outcome::Unchanged(4));

        slider.set_index(0);
        assert_eq!(slider.step_index(Step::Back), 0);
        assert_eq!(slider.step(Step::Back), Outcome::Unchanged(0));
        assert_eq!(slider.step(Step::Forward), Outcome::Changed(1));
    }

    #[test]
    fn test_fill_fraction_at_tiers() {
        let mut slider = five();
        let expected = [0.0, 0.25, 0.5, 0.75, 1.0];
        let mut last = -1.0;
        for (i, want) in expected.iter().enumerate() {
            slider.set_index(i);
            let fill = slider.fill_fraction();
            assert_eq!(fill, *want);
            assert!(fill >= last);
            last = fill;
        }
    }

    #[test]
    fn test_default_fill_is_half() {
        assert_eq!(five().fill_fraction(), 0.5);
    }

    #[test]
    fn test_single_tier_has_no_fill() {
        let mut slider = TierSlider::new(1, 0).unwrap();
        assert_eq!(slider.fill_fraction(), 0.0);
        assert_eq!(slider.pointer_down(500.0, track()), Outcome::Unchanged(0));
    }

    #[test]
    fn test_pointer_down_at_ends() {
        let mut slider = five();
        assert_eq!(slider.pointer_down(100.0, track()), Outcome::Changed(0));
        slider.pointer_up();
        assert_eq!(slider.pointer_down(500.0, track()), Outcome::Changed(4));
    }

    #[test]
    fn test_drag_move_to_sixty_percent() {
        let mut slider = five();
        slider.pointer_down(100.0, track());
        assert_eq!(slider.index(), 0);
        assert_eq!(slider.pointer_move(100.0 + 0.6 * 400.0), Outcome::Changed(2));
        assert!(slider.is_dragging());
    }

    #[test]
    fn test_drag_continues_outside_track() {
        let mut slider = five();
        slider.pointer_down(300.0, track());
        assert_eq!(slider.pointer_move(9000.0), Outcome::Changed(4));
        assert_eq!(slider.pointer_move(-50.0), Outcome::Changed(0));
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut slider = five();
        assert_eq!(slider.pointer_move(100.0), Outcome::Ignored);
        assert_eq!(slider.index(), DEFAULT_INDEX);
    }

    #[test]
    fn test_cancel_keeps_last_index() {
        let mut slider = five();
        slider.pointer_down(500.0, track());
        slider.pointer_move(400.0);
        assert_eq!(slider.index(), 3);

        slider.pointer_cancel();
        assert_eq!(slider.drag_state(), DragState::Idle);
        assert_eq!(slider.index(), 3);

        // no more updates after the gesture ended
        assert_eq!(slider.pointer_move(100.0), Outcome::Ignored);
        assert_eq!(slider.index(), 3);
    }

    #[test]
    fn test_keyboard_works_mid_drag() {
        let mut slider = five();
        slider.pointer_down(100.0, track());
        assert_eq!(slider.step(Step::Forward), Outcome::Changed(1));
        assert!(slider.is_dragging());
    }

    #[test]
    fn test_set_same_index_is_unchanged() {
        let mut slider = five();
        let before = slider.fill_fraction();
        assert_eq!(slider.set_index(DEFAULT_INDEX), Outcome::Unchanged(DEFAULT_INDEX));
        assert_eq!(slider.fill_fraction(), before);
        assert!(!slider.set_index(DEFAULT_INDEX).changed());
    }

    #[test]
    fn test_track_from_rect() {
        let t = Track::from_rect(Rect::new(10, 3, 21, 1));
        assert_eq!(t, Track::new(10.0, 20.0));
        assert!(!Track::from_rect(Rect::new(10, 3, 1, 1)).is_measurable());
        assert!(!Track::from_rect(Rect::default()).is_measurable());
    }
}
