use super::format::NumberFormat;
use std::fmt;
use std::ops::{Deref, DerefMut};
use tracing::{debug, warn};

/// Host observer. Receives the state (so it can read derived values) and the
/// committed value. Writes made through the state from inside the callback are
/// suppressed.
pub type ValueObserver = Box<dyn FnMut(&mut StepperState, Option<f64>)>;

#[derive(Clone, Debug, PartialEq)]
pub struct StepperSnapshot {
    pub display_text: String,
    pub fractional_fill: Option<f64>,
    pub decrement_enabled: bool,
    pub increment_enabled: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditPhase {
    #[default]
    Idle,
    Editing,
}

pub struct StepperState {
    value: Option<f64>,
    minimum: f64,
    maximum: f64,
    increment: f64,
    allows_empty: bool,
    last_non_empty_value: f64,
    before_edit_value: Option<f64>,
    phase: EditPhase,
    enabled: bool,
    format: NumberFormat,
    in_update: bool,
    observer: Option<ValueObserver>,
}

impl Default for StepperState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StepperState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepperState")
            .field("value", &self.value)
            .field("minimum", &self.minimum)
            .field("maximum", &self.maximum)
            .field("increment", &self.increment)
            .field("allows_empty", &self.allows_empty)
            .field("phase", &self.phase)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

// Holds the in-progress flag for the duration of one committed update; the
// flag is cleared on drop so every exit path releases it.
struct UpdateGuard<'a> {
    state: &'a mut StepperState,
}

impl<'a> UpdateGuard<'a> {
    fn enter(state: &'a mut StepperState) -> Self {
        state.in_update = true;
        Self { state }
    }
}

impl Drop for UpdateGuard<'_> {
    fn drop(&mut self) {
        self.state.in_update = false;
    }
}

impl Deref for UpdateGuard<'_> {
    type Target = StepperState;
    fn deref(&self) -> &StepperState {
        self.state
    }
}

impl DerefMut for UpdateGuard<'_> {
    fn deref_mut(&mut self) -> &mut StepperState {
        self.state
    }
}

impl StepperState {
    /// Unbounded, step 1, value 0, empty not allowed.
    pub fn new() -> Self {
        Self {
            value: Some(0.0),
            minimum: f64::NEG_INFINITY,
            maximum: f64::INFINITY,
            increment: 1.0,
            allows_empty: false,
            last_non_empty_value: 0.0,
            before_edit_value: None,
            phase: EditPhase::Idle,
            enabled: true,
            format: NumberFormat::default(),
            in_update: false,
            observer: None,
        }
    }

    // -------- builder ---------------------------------------------------------

    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        let (lo, hi) = if minimum <= maximum {
            (minimum, maximum)
        } else {
            warn!(minimum, maximum, "stepper range given inverted; swapping bounds");
            (maximum, minimum)
        };
        self.minimum = lo;
        self.maximum = hi;
        self.reclamp();
        self
    }

    pub fn with_increment(mut self, increment: f64) -> Self {
        self.set_increment(increment);
        self
    }

    pub fn with_allows_empty(mut self, allows_empty: bool) -> Self {
        self.set_allows_empty(allows_empty);
        self
    }

    /// Apply after `with_allows_empty` when the initial value is `None`.
    pub fn with_value(mut self, value: Option<f64>) -> Self {
        self.set_value(value);
        self
    }

    pub fn with_format(mut self, format: NumberFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[allow(dead_code)]
    pub fn with_observer(mut self, observer: ValueObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Option<ValueObserver>) {
        self.observer = observer;
    }

    // -------- accessors -------------------------------------------------------

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    #[allow(dead_code)]
    pub fn increment_step(&self) -> f64 {
        self.increment
    }

    #[allow(dead_code)]
    pub fn allows_empty(&self) -> bool {
        self.allows_empty
    }

    #[allow(dead_code)]
    pub fn last_non_empty_value(&self) -> f64 {
        self.last_non_empty_value
    }

    #[allow(dead_code)]
    pub fn before_edit_value(&self) -> Option<f64> {
        self.before_edit_value
    }

    #[allow(dead_code)]
    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    #[allow(dead_code)]
    pub fn is_editing(&self) -> bool {
        self.phase == EditPhase::Editing
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    #[allow(dead_code)]
    pub fn format(&self) -> &NumberFormat {
        &self.format
    }

    // -------- configuration ---------------------------------------------------

    /// Raises `maximum` too if the new minimum would exceed it.
    #[allow(dead_code)]
    pub fn set_minimum(&mut self, minimum: f64) {
        if minimum.is_nan() {
            warn!("ignoring NaN stepper minimum");
            return;
        }
        self.minimum = minimum;
        if self.maximum < minimum {
            self.maximum = minimum;
        }
        self.reclamp();
    }

    /// Lowers `minimum` too if the new maximum would fall below it.
    #[allow(dead_code)]
    pub fn set_maximum(&mut self, maximum: f64) {
        if maximum.is_nan() {
            warn!("ignoring NaN stepper maximum");
            return;
        }
        self.maximum = maximum;
        if self.minimum > maximum {
            self.minimum = maximum;
        }
        self.reclamp();
    }

    /// Non-positive or non-finite steps are ignored.
    pub fn set_increment(&mut self, increment: f64) -> bool {
        if !(increment.is_finite() && increment > 0.0) {
            warn!(increment, "ignoring invalid stepper increment");
            return false;
        }
        self.increment = increment;
        self.reclamp();
        true
    }

    /// Turning empty support off while empty commits the last concrete value.
    pub fn set_allows_empty(&mut self, allows_empty: bool) {
        self.allows_empty = allows_empty;
        if !allows_empty && self.value.is_none() {
            let restored = self.last_non_empty_value;
            self.set_value(Some(restored));
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[allow(dead_code)]
    pub fn set_format(&mut self, format: NumberFormat) {
        self.format = format;
    }

    fn reclamp(&mut self) {
        if let Some(v) = self.value {
            if v < self.minimum || v > self.maximum {
                self.set_value(Some(v));
            }
        }
    }

    // -------- value mutation --------------------------------------------------

    pub fn clamp(&self, value: f64) -> f64 {
        value.min(self.maximum).max(self.minimum)
    }

    /// Commits `value` (clamped). Returns `false` when nothing was committed:
    /// empty without `allows_empty`, NaN, or a re-entrant call from the
    /// observer. The observer only fires when the committed value differs from
    /// the previous one.
    pub fn set_value(&mut self, value: Option<f64>) -> bool {
        if self.in_update {
            debug!(?value, "suppressed re-entrant stepper update");
            return false;
        }
        let next = match value {
            None if !self.allows_empty => {
                debug!("empty value rejected: stepper does not allow empty");
                return false;
            }
            None => None,
            Some(v) if v.is_nan() => {
                warn!("ignoring NaN stepper value");
                return false;
            }
            Some(v) => Some(self.clamp(v)),
        };
        let changed = next != self.value;

        let mut guard = UpdateGuard::enter(self);
        guard.value = next;
        if let Some(v) = next {
            guard.last_non_empty_value = v;
        }
        if changed {
            debug!(value = ?next, "stepper value committed");
            guard.notify(next);
        }
        true
    }

    fn notify(&mut self, value: Option<f64>) {
        if let Some(mut observer) = self.observer.take() {
            observer(self, value);
            // The callback may have installed a replacement.
            if self.observer.is_none() {
                self.observer = Some(observer);
            }
        }
    }

    pub fn increment(&mut self) -> bool {
        self.step_by(self.increment)
    }

    pub fn decrement(&mut self) -> bool {
        self.step_by(-self.increment)
    }

    fn step_by(&mut self, delta: f64) -> bool {
        let base = self.value.unwrap_or(self.last_non_empty_value);
        let next = self.clamp(base + delta);
        self.set_value(Some(next))
    }

    // -------- edit session ----------------------------------------------------

    pub fn begin_edit(&mut self) {
        self.before_edit_value = self.value;
        self.phase = EditPhase::Editing;
        debug!(before = ?self.value, "stepper edit started");
    }

    /// Restores the value captured by `begin_edit`. No-op while idle.
    pub fn cancel_edit(&mut self) -> bool {
        if self.phase != EditPhase::Editing {
            return false;
        }
        let restore = self.before_edit_value.take();
        self.phase = EditPhase::Idle;
        debug!(restore = ?restore, "stepper edit cancelled");
        self.set_value(restore);
        true
    }

    /// Commits typed text. A rejected commit leaves the value, the snapshot
    /// and the edit phase untouched so the host can keep the typed text and a
    /// later cancel still restores.
    pub fn commit_edited_text<P>(&mut self, text: &str, parse: P) -> bool
    where
        P: Fn(&str) -> Option<f64>,
    {
        let next = if text.is_empty() && self.allows_empty {
            None
        } else {
            match parse(text) {
                Some(v) => Some(v),
                None => {
                    debug!(text, "stepper commit rejected: unparseable text");
                    return false;
                }
            }
        };
        if !self.set_value(next) {
            return false;
        }
        self.before_edit_value = None;
        self.phase = EditPhase::Idle;
        true
    }

    /// `commit_edited_text` with this stepper's own format.
    pub fn commit_text(&mut self, text: &str) -> bool {
        let format = self.format.clone();
        self.commit_edited_text(text, |t| format.parse(t))
    }

    pub fn is_valid_text<P>(&self, text: &str, parse: P) -> bool
    where
        P: Fn(&str) -> Option<f64>,
    {
        if text.is_empty() {
            return self.allows_empty;
        }
        parse(text).is_some()
    }

    pub fn is_valid(&self, text: &str) -> bool {
        self.is_valid_text(text, |t| self.format.parse(t))
    }

    // -------- derived state ---------------------------------------------------

    pub fn display_text(&self) -> String {
        match self.value {
            Some(v) => self.format.format(v),
            None => String::new(),
        }
    }

    /// Position of the value within a finite range. A degenerate range
    /// (`minimum == maximum`) has no defined position and draws no fill.
    pub fn fractional_fill(&self) -> Option<f64> {
        let value = self.value?;
        if !(self.minimum.is_finite() && self.maximum.is_finite()) {
            return None;
        }
        // Halved operands keep the span finite for bounds near f64::MAX
        let span = self.maximum / 2.0 - self.minimum / 2.0;
        if span <= 0.0 {
            return None;
        }
        let fill = (value / 2.0 - self.minimum / 2.0) / span;
        fill.is_finite().then(|| fill.clamp(0.0, 1.0))
    }

    pub fn decrement_enabled(&self) -> bool {
        self.enabled && self.value != Some(self.minimum)
    }

    pub fn increment_enabled(&self) -> bool {
        self.enabled && self.value != Some(self.maximum)
    }

    pub fn snapshot(&self) -> StepperSnapshot {
        StepperSnapshot {
            display_text: self.display_text(),
            fractional_fill: self.fractional_fill(),
            decrement_enabled: self.decrement_enabled(),
            increment_enabled: self.increment_enabled(),
        }
    }
}
