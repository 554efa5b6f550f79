//! UI module for rendering the TUI

mod dialog;
mod forms;
mod layout;

use crate::app::App;
use crate::state::WizardStep;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let (header_area, content_area) = layout::create_layout(area);
    layout::draw_header(frame, header_area, app);

    if app.wizard.submit_success {
        forms::draw_success(frame, content_area, app);
    } else {
        match app.wizard.step {
            WizardStep::PersonalInfo => forms::draw_personal_info(frame, content_area, app),
            WizardStep::ProjectDetails => forms::draw_project_details(frame, content_area, app),
            WizardStep::Confirmation => forms::draw_confirmation(frame, content_area, app),
        }
    }

    layout::draw_status_bar(frame, app);

    // Submission failure overlay (modal)
    if let Some(message) = &app.wizard.submit_error {
        dialog::render_submit_error(frame, message);
    }
}
