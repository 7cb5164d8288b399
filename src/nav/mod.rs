//! Navigation model: cursor, page slugs and the simulated navigation.
//!
//! This is the single piece of mutable application state. A cursor indexes
//! into a fixed, ordered row of buttons and wraps modulo the button count in
//! both directions. Activating the highlighted button derives a page slug
//! from its label and drives a two-phase status update: immediately
//! "Navigating to {page}...", then "Welcome to {page} page!" once the
//! configured delay has elapsed. Deferred updates are not cancellable, so
//! two activations in quick succession will overwrite each other's welcome
//! message in firing order.
//!
//! Gesture and keyboard input both land on the same methods here, which is
//! what guarantees that a blink and an Enter press on the same cursor
//! position navigate to the same page.

use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Navigation commands produced by the mapping layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavCommand {
    /// Move the cursor one button to the right (wraps).
    Next,
    /// Move the cursor one button to the left (wraps).
    Prev,
    /// Activate the currently highlighted button.
    Activate,
}

/// A single navigable button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavButton {
    pub label: String,
}

/// A scheduled "Welcome to {page} page!" status update.
#[derive(Clone, Debug)]
struct PendingNavigation {
    page: String,
    due: Instant,
}

/// Derives the navigation target identifier from a button label.
///
/// Lowercases the label and strips everything that is not an ASCII letter,
/// so "Home Page 1!" becomes "homepage".
pub fn page_slug(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Cursor, status line and pending navigations over a fixed button row.
#[derive(Debug)]
pub struct NavModel {
    buttons: Vec<NavButton>,
    cursor: usize,
    status: String,
    pending: Vec<PendingNavigation>,
    navigation_delay: Duration,
}

impl NavModel {
    /// Default button labels used when the config lists none.
    pub fn default_labels() -> Vec<String> {
        ["Home", "News", "Videos", "Settings"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Creates the model with the first button highlighted.
    ///
    /// An empty label list falls back to the defaults so the cursor
    /// invariant (`cursor < buttons.len()`) holds from the start.
    pub fn new(labels: Vec<String>, navigation_delay: Duration) -> Self {
        let labels = if labels.is_empty() {
            Self::default_labels()
        } else {
            labels
        };

        let buttons = labels
            .into_iter()
            .map(|label| NavButton { label })
            .collect::<Vec<_>>();

        let mut model = Self {
            buttons,
            cursor: 0,
            status: String::new(),
            pending: Vec::new(),
            navigation_delay,
        };
        model.announce_selection();
        // The waiting message wins the status line until the first event.
        model.set_status("Waiting for camera feed from gesture tracker...");
        model
    }

    pub fn buttons(&self) -> &[NavButton] {
        &self.buttons
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Moves the highlight one button right, wrapping past the end.
    pub fn select_next(&mut self) {
        self.cursor = (self.cursor + 1) % self.buttons.len();
        self.announce_selection();
    }

    /// Moves the highlight one button left, wrapping past the start.
    ///
    /// The count is added before the modulo so the index never underflows.
    pub fn select_prev(&mut self) {
        self.cursor = (self.cursor + self.buttons.len() - 1) % self.buttons.len();
        self.announce_selection();
    }

    /// Moves the highlight directly to `index` (mouse/touch path).
    pub fn select(&mut self, index: usize) {
        if index < self.buttons.len() {
            self.cursor = index;
            self.announce_selection();
        }
    }

    /// Activates the highlighted button and schedules the welcome status.
    ///
    /// Returns the derived page slug. The immediate status switches to
    /// "Navigating to {page}..."; the welcome message fires from
    /// [`NavModel::tick`] once the navigation delay has passed.
    pub fn activate(&mut self, now: Instant) -> String {
        let page = page_slug(&self.buttons[self.cursor].label);
        info!("Navigating to: {}", page);

        self.status = format!("Navigating to {}...", page);
        self.pending.push(PendingNavigation {
            page: page.clone(),
            due: now + self.navigation_delay,
        });
        page
    }

    /// Applies a mapped navigation command.
    pub fn apply(&mut self, command: NavCommand, now: Instant) {
        debug!("Applying navigation command: {:?}", command);
        match command {
            NavCommand::Next => self.select_next(),
            NavCommand::Prev => self.select_prev(),
            NavCommand::Activate => {
                self.activate(now);
            }
        }
    }

    /// Fires due deferred navigations.
    ///
    /// Called once per UI frame. Entries fire in insertion order; when
    /// several are due in the same tick the last one wins the status line.
    /// Scheduled entries are never cancelled by later activations.
    pub fn tick(&mut self, now: Instant) {
        let mut fired = Vec::new();
        self.pending.retain(|entry| {
            if entry.due <= now {
                fired.push(entry.page.clone());
                false
            } else {
                true
            }
        });

        for page in fired {
            self.status = format!("Welcome to {} page!", page);
        }
    }

    /// Number of not-yet-fired deferred navigations.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    fn announce_selection(&mut self) {
        let label = &self.buttons[self.cursor].label;
        self.status = format!("Button {} selected: {}", self.cursor + 1, label);
        debug!("Button highlighted: {} - {}", self.cursor, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(n: usize) -> NavModel {
        let labels = (0..n).map(|i| format!("Button {}", i)).collect();
        NavModel::new(labels, Duration::from_millis(1000))
    }

    #[test]
    fn next_wraps_back_to_start_for_all_counts() {
        for n in 1..=8 {
            let mut nav = model(n);
            for _ in 0..n {
                nav.select_next();
            }
            assert_eq!(nav.cursor(), 0, "count {}", n);
        }
    }

    #[test]
    fn prev_wraps_back_to_start_for_all_counts() {
        for n in 1..=8 {
            let mut nav = model(n);
            for _ in 0..n {
                nav.select_prev();
            }
            assert_eq!(nav.cursor(), 0, "count {}", n);
        }
    }

    #[test]
    fn prev_from_zero_lands_on_last_button() {
        let mut nav = model(4);
        nav.select_prev();
        assert_eq!(nav.cursor(), 3);
    }

    #[test]
    fn single_button_cursor_is_stable() {
        let mut nav = model(1);
        nav.select_next();
        nav.select_prev();
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn slug_lowercases_and_strips_non_letters() {
        assert_eq!(page_slug("Home Page 1!"), "homepage");
        assert_eq!(page_slug("Settings"), "settings");
        assert_eq!(page_slug("  News  "), "news");
    }

    #[test]
    fn gesture_and_key_activation_derive_the_same_target() {
        let now = Instant::now();
        let mut via_blink = model(3);
        via_blink.select_next();
        let blink_page = via_blink.activate(now);

        let mut via_enter = model(3);
        via_enter.select_next();
        via_enter.apply(NavCommand::Activate, now);

        assert_eq!(blink_page, "button");
        assert_eq!(via_enter.status(), via_blink.status());
    }

    #[test]
    fn activation_is_a_two_phase_status_update() {
        let start = Instant::now();
        let mut nav = model(2);
        let page = nav.activate(start);

        assert_eq!(nav.status(), format!("Navigating to {}...", page));
        assert_eq!(nav.pending_count(), 1);

        nav.tick(start + Duration::from_millis(999));
        assert_eq!(nav.status(), format!("Navigating to {}...", page));

        nav.tick(start + Duration::from_millis(1000));
        assert_eq!(nav.status(), format!("Welcome to {} page!", page));
        assert_eq!(nav.pending_count(), 0);
    }

    #[test]
    fn overlapping_navigations_fire_in_order_and_last_wins() {
        let start = Instant::now();
        let mut nav = model(2);

        nav.activate(start); // button 1
        nav.select_next();
        nav.activate(start + Duration::from_millis(100)); // button 2

        nav.tick(start + Duration::from_millis(1500));
        assert_eq!(nav.status(), "Welcome to button page!");
        assert_eq!(nav.pending_count(), 0);
    }

    #[test]
    fn empty_label_list_falls_back_to_defaults() {
        let nav = NavModel::new(Vec::new(), Duration::from_millis(1000));
        assert_eq!(nav.buttons().len(), 4);
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn selection_updates_the_status_line() {
        let mut nav = model(3);
        nav.select_next();
        assert_eq!(nav.status(), "Button 2 selected: Button 1");
    }
}
