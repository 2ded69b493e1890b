//! Popup UI state
//!
//! Everything the popup shows lives here. The controller mutates it through
//! the setters below; the renderer only reads it.

use std::time::{Duration, Instant};

use shared::{CategorySelection, LabelCategories, Severity};
use tui_input::Input;

/// How long success and info banners stay up
pub const STATUS_AUTO_HIDE: Duration = Duration::from_secs(5);

/// Which control receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Category,
    NewCategory,
    Sku,
    Copies,
    Print,
}

/// The status banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub message: String,
    pub severity: Severity,
    shown_at: Instant,
}

impl StatusBanner {
    fn expired(&self, now: Instant) -> bool {
        self.severity.auto_hides() && now.duration_since(self.shown_at) >= STATUS_AUTO_HIDE
    }
}

#[derive(Debug)]
pub struct PopupState {
    options: Vec<CategorySelection>,
    selected: usize,
    add_form_open: bool,
    pub new_category: Input,
    pub sku: Input,
    pub copies: Input,
    focus: Focus,
    status: Option<StatusBanner>,
    printing: bool,
}

impl Default for PopupState {
    fn default() -> Self {
        Self::new()
    }
}

impl PopupState {
    pub fn new() -> Self {
        Self {
            options: vec![CategorySelection::Placeholder, CategorySelection::AddNew],
            selected: 0,
            add_form_open: false,
            new_category: Input::default(),
            sku: Input::default(),
            copies: Input::new("1".to_string()),
            focus: Focus::default(),
            status: None,
            printing: false,
        }
    }

    // ========== Status ==========

    pub fn set_status(&mut self, message: impl Into<String>, severity: Severity) {
        self.set_status_at(message, severity, Instant::now());
    }

    pub fn set_status_at(&mut self, message: impl Into<String>, severity: Severity, now: Instant) {
        self.status = Some(StatusBanner {
            message: message.into(),
            severity,
            shown_at: now,
        });
    }

    pub fn status(&self) -> Option<&StatusBanner> {
        self.status.as_ref()
    }

    /// Hide an expired success/info banner
    pub fn tick(&mut self, now: Instant) {
        if self.status.as_ref().is_some_and(|s| s.expired(now)) {
            self.status = None;
        }
    }

    // ========== Category selector ==========

    /// Rebuild the selector: placeholder, the stored list, then the add entry.
    ///
    /// The current selection is kept when it is still offered.
    pub fn set_category_options(&mut self, categories: &LabelCategories) {
        let current = self.selection().clone();

        self.options = std::iter::once(CategorySelection::Placeholder)
            .chain(categories.iter().cloned().map(CategorySelection::Category))
            .chain(std::iter::once(CategorySelection::AddNew))
            .collect();

        self.selected = self
            .options
            .iter()
            .position(|o| *o == current)
            .unwrap_or(0);
    }

    pub fn options(&self) -> &[CategorySelection] {
        &self.options
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selection(&self) -> &CategorySelection {
        // options always holds at least the placeholder and the add entry
        &self.options[self.selected.min(self.options.len() - 1)]
    }

    /// Select an option by its raw value. Returns false when not offered.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value() == value) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.options.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    // ========== Add form ==========

    pub fn is_add_form_open(&self) -> bool {
        self.add_form_open
    }

    pub fn open_add_form(&mut self) {
        self.add_form_open = true;
        self.focus = Focus::NewCategory;
    }

    pub fn close_add_form(&mut self) {
        self.add_form_open = false;
        self.new_category.reset();
        if self.focus == Focus::NewCategory {
            self.focus = Focus::Category;
        }
    }

    // ========== Fields ==========

    pub fn clear_sku_field(&mut self) {
        self.sku.reset();
    }

    pub fn reset_copies(&mut self) {
        self.copies = Input::new("1".to_string());
    }

    /// Step the copies field by `delta`, staying within 1..=max
    pub fn step_copies(&mut self, delta: i32, max: u8) {
        let current = self.copies.value().trim().parse::<i32>().unwrap_or(1);
        let next = (current + delta).clamp(1, i32::from(max));
        self.copies = Input::new(next.to_string());
    }

    // ========== Focus ==========

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: Focus) {
        if focus == Focus::NewCategory && !self.add_form_open {
            return;
        }
        self.focus = focus;
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            Focus::Category if self.add_form_open => Focus::NewCategory,
            Focus::Category | Focus::NewCategory => Focus::Sku,
            Focus::Sku => Focus::Copies,
            Focus::Copies => Focus::Print,
            Focus::Print => Focus::Category,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            Focus::Category => Focus::Print,
            Focus::NewCategory => Focus::Category,
            Focus::Sku if self.add_form_open => Focus::NewCategory,
            Focus::Sku => Focus::Category,
            Focus::Copies => Focus::Sku,
            Focus::Print => Focus::Copies,
        };
    }

    // ========== Print control ==========

    pub fn is_printing(&self) -> bool {
        self.printing
    }

    pub fn set_printing(&mut self, printing: bool) {
        self.printing = printing;
    }
}
