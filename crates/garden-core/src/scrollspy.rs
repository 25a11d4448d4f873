//! Scroll-spy for the About section.
//!
//! Sections report intersection samples as the user scrolls; the navigator
//! scores each one by visibility and by how close its center sits to an
//! anchor line in the viewport, and switches the active tab only when a
//! challenger wins by a margin and the last switch is old enough. Tab clicks
//! put the navigator in programmatic mode so the smooth scroll they start is
//! not fought by the observer.

use crate::constants::*;

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollSpyConfig {
    /// Anchor line as a fraction of viewport height from the top.
    pub anchor_ratio: f32,
    pub min_margin: f32,
    pub min_switch_interval_ms: f64,
    pub quiet_period_ms: f64,
    pub tab_debounce_ms: f64,
    pub bottom_threshold_px: f32,
    pub ratio_weight: f32,
    pub proximity_weight: f32,
}

impl Default for ScrollSpyConfig {
    fn default() -> Self {
        Self {
            anchor_ratio: SPY_ANCHOR_RATIO,
            min_margin: SPY_MIN_MARGIN,
            min_switch_interval_ms: SPY_MIN_SWITCH_INTERVAL_MS,
            quiet_period_ms: SPY_QUIET_PERIOD_MS,
            tab_debounce_ms: SPY_TAB_DEBOUNCE_MS,
            bottom_threshold_px: SPY_BOTTOM_THRESHOLD_PX,
            ratio_weight: SPY_RATIO_WEIGHT,
            proximity_weight: SPY_PROXIMITY_WEIGHT,
        }
    }
}

/// One intersection observation for a section, in viewport coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionSample {
    pub index: usize,
    pub intersecting: bool,
    pub intersection_ratio: f32,
    /// Top edge relative to the viewport top, in px.
    pub top: f32,
    pub height: f32,
}

/// Scroll container geometry, as read from `scrollTop` and friends.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f32,
    pub scroll_height: f32,
    pub client_height: f32,
}

impl ScrollMetrics {
    pub fn is_at_bottom(&self, threshold_px: f32) -> bool {
        self.scroll_height - self.scroll_top - self.client_height < threshold_px
    }
}

/// Instruction for the host to scroll a section into view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollCommand {
    pub section: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollMode {
    Organic,
    /// A tab click is scrolling toward `target`.
    Programmatic { target: usize },
}

/// A value that only settles after it stops changing for `delay_ms`.
#[derive(Clone, Debug, PartialEq)]
pub struct Debounced<T> {
    settled: T,
    pending: Option<(T, f64)>,
    delay_ms: f64,
}

impl<T: Clone + PartialEq> Debounced<T> {
    pub fn new(value: T, delay_ms: f64) -> Self {
        Self {
            settled: value,
            pending: None,
            delay_ms,
        }
    }

    pub fn set(&mut self, value: T, now: f64) {
        if self.pending.is_none() && value == self.settled {
            return;
        }
        self.pending = Some((value, now + self.delay_ms));
    }

    /// Returns the newly settled value, if one settled at `now`.
    pub fn poll(&mut self, now: f64) -> Option<T> {
        let (_, due) = self.pending.as_ref()?;
        if now < *due {
            return None;
        }
        let (value, _) = self.pending.take()?;
        if value == self.settled {
            return None;
        }
        self.settled = value.clone();
        Some(value)
    }

    #[inline]
    pub fn get(&self) -> &T {
        &self.settled
    }
}

pub struct ScrollSpy {
    config: ScrollSpyConfig,
    samples: Vec<Option<SectionSample>>,
    viewport_height: f32,
    active: usize,
    last_switch: Option<f64>,
    mode: ScrollMode,
    last_scroll_at: f64,
    at_bottom: bool,
    tab: Debounced<usize>,
}

impl ScrollSpy {
    pub fn new(section_count: usize, initial: usize, config: ScrollSpyConfig) -> Self {
        let active = initial.min(section_count.saturating_sub(1));
        let tab = Debounced::new(active, config.tab_debounce_ms);
        Self {
            config,
            samples: vec![None; section_count],
            viewport_height: 0.0,
            active,
            last_switch: None,
            mode: ScrollMode::Organic,
            last_scroll_at: f64::NEG_INFINITY,
            at_bottom: false,
            tab,
        }
    }

    #[inline]
    pub fn section_count(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Tab index after the debounce has settled; what the host reports out.
    #[inline]
    pub fn debounced_tab(&self) -> usize {
        *self.tab.get()
    }

    #[inline]
    pub fn mode(&self) -> ScrollMode {
        self.mode
    }

    #[inline]
    pub fn is_programmatic(&self) -> bool {
        matches!(self.mode, ScrollMode::Programmatic { .. })
    }

    #[inline]
    pub fn at_bottom(&self) -> bool {
        self.at_bottom
    }

    /// Composite visibility score for a section from its latest sample.
    pub fn score(&self, index: usize) -> f32 {
        let Some(Some(s)) = self.samples.get(index) else {
            return 0.0;
        };
        if !s.intersecting || self.viewport_height <= 0.0 {
            return 0.0;
        }
        let anchor = self.config.anchor_ratio * self.viewport_height;
        let center = s.top + s.height * 0.5;
        let proximity = 1.0 - ((center - anchor).abs() / self.viewport_height).min(1.0);
        self.config.ratio_weight * s.intersection_ratio.clamp(0.0, 1.0)
            + self.config.proximity_weight * proximity
    }

    /// Record intersection samples (only changed sections need be passed).
    /// Returns the new active section if it switched.
    pub fn observe(
        &mut self,
        samples: &[SectionSample],
        viewport_height: f32,
        now: f64,
    ) -> Option<usize> {
        if viewport_height.is_finite() && viewport_height > 0.0 {
            self.viewport_height = viewport_height;
        }
        for s in samples {
            if let Some(slot) = self.samples.get_mut(s.index) {
                *slot = Some(*s);
            }
        }
        if self.is_programmatic() {
            return None;
        }
        // At the bottom the last section holds regardless of score.
        if self.at_bottom {
            let last = self.section_count().checked_sub(1)?;
            if last == self.active {
                return None;
            }
            return self.try_switch(last, now);
        }
        let (best, best_score) = self.best_candidate()?;
        if best == self.active {
            return None;
        }
        if best_score < self.score(self.active) + self.config.min_margin {
            return None;
        }
        self.try_switch(best, now)
    }

    /// Note a scroll event on the container.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics, now: f64) -> Option<usize> {
        self.last_scroll_at = now;
        self.at_bottom = metrics.is_at_bottom(self.config.bottom_threshold_px);
        if self.is_programmatic() || !self.at_bottom {
            return None;
        }
        let last = self.section_count().checked_sub(1)?;
        if last == self.active {
            return None;
        }
        self.try_switch(last, now)
    }

    /// User picked a tab. Returns where to scroll, or `None` if the index is
    /// out of range or already active.
    pub fn select(&mut self, index: usize, now: f64) -> Option<ScrollCommand> {
        if index >= self.section_count() {
            log::warn!("[spy] ignoring tab {} of {}", index, self.section_count());
            return None;
        }
        if index == self.active && !self.is_programmatic() {
            return None;
        }
        self.active = index;
        self.last_switch = Some(now);
        self.last_scroll_at = now;
        self.mode = ScrollMode::Programmatic { target: index };
        self.tab.set(index, now);
        log::debug!("[spy] tab {} selected", index);
        Some(ScrollCommand { section: index })
    }

    /// Explicit end of a programmatic scroll (e.g. the `scrollend` event).
    pub fn scroll_end(&mut self) {
        if self.is_programmatic() {
            self.mode = ScrollMode::Organic;
        }
    }

    /// Periodic housekeeping: leaves programmatic mode after a quiet period
    /// and settles the debounced tab. Returns a newly settled tab index.
    pub fn tick(&mut self, now: f64) -> Option<usize> {
        if self.is_programmatic() && now - self.last_scroll_at >= self.config.quiet_period_ms {
            self.mode = ScrollMode::Organic;
        }
        self.tab.poll(now)
    }

    fn best_candidate(&self) -> Option<(usize, f32)> {
        (0..self.section_count())
            .map(|i| (i, self.score(i)))
            .filter(|(_, s)| *s > 0.0)
            .fold(None, |best: Option<(usize, f32)>, (i, s)| match best {
                Some((_, bs)) if bs >= s => best,
                _ => Some((i, s)),
            })
    }

    fn try_switch(&mut self, index: usize, now: f64) -> Option<usize> {
        if let Some(last) = self.last_switch {
            if now - last < self.config.min_switch_interval_ms {
                return None;
            }
        }
        self.active = index;
        self.last_switch = Some(now);
        self.tab.set(index, now);
        log::debug!("[spy] active section {}", index);
        Some(index)
    }
}

/// Keyboard navigation over a tab list: returns the tab to select.
pub fn tab_for_key(key: &str, focused: usize, count: usize) -> Option<usize> {
    if count == 0 {
        return None;
    }
    let focused = focused.min(count - 1);
    match key {
        "Enter" | " " | "Spacebar" => Some(focused),
        "ArrowRight" | "ArrowDown" => Some((focused + 1) % count),
        "ArrowLeft" | "ArrowUp" => Some((focused + count - 1) % count),
        "Home" => Some(0),
        "End" => Some(count - 1),
        _ => None,
    }
}
