//! Popup controller
//!
//! Glue between the UI state, the category store and the print workflow.
//! Every workflow result ends up as a status banner; nothing propagates past
//! this layer.

use std::sync::Arc;

use label_printer::{
    PrintError, PrintOutcome, PrintProgress, PrintRequest, PrintResult, PrintWorkflow,
};
use shared::{LabelCategories, Severity};
use tracing::{info, warn};

use crate::state::{Focus, PopupState};
use crate::store::{CategoryStore, load_categories, save_categories};

pub const CATEGORY_ADDED: &str = "Label type added successfully";

pub struct PopupController {
    workflow: Arc<PrintWorkflow>,
    store: Box<dyn CategoryStore + Send>,
    categories: LabelCategories,
}

impl PopupController {
    /// Load the stored categories and wrap the workflow.
    pub fn new(workflow: Arc<PrintWorkflow>, store: Box<dyn CategoryStore + Send>) -> Self {
        let categories = load_categories(store.as_ref());
        Self {
            workflow,
            store,
            categories,
        }
    }

    pub fn workflow(&self) -> Arc<PrintWorkflow> {
        Arc::clone(&self.workflow)
    }

    /// Populate a fresh popup.
    pub fn init(&self, state: &mut PopupState) {
        state.set_category_options(&self.categories);
    }

    /// React to the selector moving: the add entry opens the inline form.
    pub fn on_category_changed(&self, state: &mut PopupState) {
        if state.selection().is_add_new() {
            state.open_add_form();
        } else if state.is_add_form_open() {
            state.close_add_form();
        }
    }

    /// Save the category typed into the add form.
    pub fn save_new_category(&mut self, state: &mut PopupState) {
        let raw = state.new_category.value().to_string();
        match self.categories.add(&raw) {
            Ok(category) => {
                save_categories(self.store.as_ref(), &self.categories);
                state.set_category_options(&self.categories);
                state.select_value(category.as_str());
                state.close_add_form();
                state.set_focus(Focus::Sku);
                state.set_status(CATEGORY_ADDED, Severity::Success);
                info!(category = %category, "Label type added");
            }
            Err(e) => state.set_status(e.to_string(), Severity::Error),
        }
    }

    /// Close the add form and go back to the placeholder.
    pub fn cancel_new_category(&self, state: &mut PopupState) {
        state.close_add_form();
        state.select_value("");
    }

    /// Validate the form and mark the print as started.
    ///
    /// Returns `None` when the input is rejected or a print is already
    /// running; the reason is shown in the status banner.
    pub fn prepare_print(&self, state: &mut PopupState) -> Option<PrintRequest> {
        if state.is_printing() || self.workflow.is_busy() {
            self.report_error(state, &PrintError::Busy);
            return None;
        }

        let copies = state.copies.value().trim().parse::<u32>().unwrap_or(0);
        let request = PrintRequest::new(state.selection().value(), state.sku.value())
            .and_then(|request| request.with_copies(copies));

        match request {
            Ok(request) => {
                state.set_printing(true);
                Some(request)
            }
            Err(e) => {
                self.report_error(state, &e);
                None
            }
        }
    }

    pub fn apply_progress(&self, state: &mut PopupState, progress: PrintProgress) {
        state.set_status(progress.to_string(), Severity::Info);
    }

    /// Show the outcome of a finished print.
    pub fn apply_result(&self, state: &mut PopupState, result: PrintResult<PrintOutcome>) {
        state.set_printing(false);
        match result {
            Ok(outcome) => {
                state.set_status(outcome.message(), Severity::Success);
                state.clear_sku_field();
                state.reset_copies();
                state.set_focus(Focus::Sku);
            }
            Err(e) => self.report_error(state, &e),
        }
    }

    fn report_error(&self, state: &mut PopupState, error: &PrintError) {
        if error.is_validation() {
            state.set_status(error.to_string(), Severity::Error);
        } else {
            warn!(kind = error.kind(), error = %error, "Print failed");
            state.set_status(format!("Print failed: {}", error), Severity::Error);
        }
    }
}
