//! Layout components (progress header, status bar)

use crate::app::App;
use crate::state::WizardStep;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into header and content, reserving the bottom line
/// for the status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with progress steps
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the title and the three-stage progress header
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Progress steps
            Constraint::Length(1), // Spacer
        ])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        " Devis Gratuit — Débarras Pro ",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));
    frame.render_widget(title, chunks[0]);

    let current = app.wizard.step.number();
    let mut spans = vec![Span::raw(" ")];
    for step in WizardStep::ALL {
        let reached = current >= step.number();
        let style = if reached {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(
            format!("{}. {}", step.number(), step.label()),
            style,
        ));
        if step != WizardStep::Confirmation {
            spans.push(Span::styled("  ─  ", Style::default().fg(Color::DarkGray)));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    if app.wizard.is_submitting {
        spans.push(Span::styled(
            " ● Envoi en cours... ",
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::raw("| "));
    }

    let hints = get_step_hints(app);
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Quit hint on the right
    let quit_hint = " ^C:quitter ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the current wizard position
fn get_step_hints(app: &App) -> String {
    if app.wizard.submit_success {
        return " Entrée:nouvelle demande".to_string();
    }
    if app.wizard.submit_error.is_some() {
        return " Entrée/Échap:fermer".to_string();
    }
    match app.wizard.step {
        WizardStep::PersonalInfo => " Tab:champ suivant  Entrée:continuer".to_string(),
        WizardStep::ProjectDetails => {
            " Tab:champ suivant  ←/→:choisir  Espace:cocher  Entrée:continuer  Échap:retour"
                .to_string()
        }
        WizardStep::Confirmation => {
            " Tab:champ suivant  Espace:consentement  Entrée:envoyer  Échap:retour".to_string()
        }
    }
}
