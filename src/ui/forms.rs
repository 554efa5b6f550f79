//! Wizard step rendering: fields, checkboxes, recap and success view

use crate::app::App;
use crate::state::{Field, ServiceKind, Urgency};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn border_style(is_active: bool, has_error: bool) -> Style {
    if has_error {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Field block with the label on top and the validation error, if any,
/// woven into the bottom border
fn field_block<'a>(app: &'a App, field: Field, label: &'a str) -> Block<'a> {
    let is_active = app.active_field() == field;
    let error = app.wizard.errors.get(&field);

    let mut block = Block::default()
        .title(format!(" {label} "))
        .borders(Borders::ALL)
        .border_style(border_style(is_active, error.is_some()));

    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        )));
    }

    block
}

/// Draw a text-backed field
fn draw_text_field(frame: &mut Frame, area: Rect, app: &App, field: Field, label: &str) {
    let is_active = app.active_field() == field;
    let value = app.wizard.text_value(field).unwrap_or("");

    let display_value = if value.is_empty() && !is_active {
        "(vide)"
    } else {
        value
    };
    let value_style = if value.is_empty() && !is_active {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    let cursor = if is_active { "▌" } else { "" };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_value, value_style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]))
    .wrap(Wrap { trim: false });

    frame.render_widget(content.block(field_block(app, field, label)), area);
}

/// Draw a catalog select: Left/Right cycle through the fixed set
fn draw_select_field(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    field: Field,
    label: &str,
    selected: Option<&str>,
) {
    let content = match selected {
        Some(value) => Line::from(vec![
            Span::styled("‹ ", Style::default().fg(Color::DarkGray)),
            Span::raw(value),
            Span::styled(" ›", Style::default().fg(Color::DarkGray)),
        ]),
        None => Line::from(Span::styled(
            "Sélectionnez...",
            Style::default().fg(Color::DarkGray),
        )),
    };

    frame.render_widget(
        Paragraph::new(content).block(field_block(app, field, label)),
        area,
    );
}

/// Draw the six service checkboxes
fn draw_services(frame: &mut Frame, area: Rect, app: &App) {
    let is_active = app.active_field() == Field::Services;

    let lines: Vec<Line> = ServiceKind::ALL
        .iter()
        .enumerate()
        .map(|(idx, service)| {
            let checked = app.wizard.is_service_selected(*service);
            let marker = if checked { "[x]" } else { "[ ]" };
            let highlighted = is_active && idx == app.focus.service_cursor;
            let style = if highlighted {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Line::from(Span::styled(format!("{marker} {}", service.label()), style))
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).block(field_block(app, Field::Services, "Services nécessaires")),
        area,
    );
}

/// Draw the urgency radio group
fn draw_urgency(frame: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = Urgency::ALL
        .iter()
        .map(|urgency| {
            let selected = app.wizard.urgency == Some(*urgency);
            let marker = if selected { "(•)" } else { "( )" };
            let style = if selected {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!("{marker} {}", urgency.label()), style),
                Span::styled(
                    format!("  {}", urgency.detail()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    frame.render_widget(
        Paragraph::new(lines).block(field_block(app, Field::Urgency, "Urgence (←/→)")),
        area,
    );
}

/// Step 1: personal info
pub fn draw_personal_info(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Informations personnelles ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Name
            Constraint::Length(3), // Email
            Constraint::Length(3), // Phone
            Constraint::Length(3), // Address
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    draw_text_field(frame, chunks[0], app, Field::Name, "Nom complet*");
    draw_text_field(frame, chunks[1], app, Field::Email, "Email*");
    draw_text_field(frame, chunks[2], app, Field::Phone, "Téléphone*");
    draw_text_field(frame, chunks[3], app, Field::Address, "Adresse*");
}

/// Step 2: project details
pub fn draw_project_details(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Détails du projet ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Property type
            Constraint::Length(3), // Surface
            Constraint::Length(4), // Description
            Constraint::Length(8), // Services
            Constraint::Length(5), // Urgency
            Constraint::Min(0),
        ])
        .margin(1)
        .split(area);

    draw_select_field(
        frame,
        chunks[0],
        app,
        Field::PropertyType,
        "Type de bien* (←/→)",
        app.wizard.property_type.map(|t| t.label()),
    );
    draw_text_field(frame, chunks[1], app, Field::Surface, "Surface (m²)*");
    draw_text_field(
        frame,
        chunks[2],
        app,
        Field::Description,
        "Description détaillée*",
    );
    draw_services(frame, chunks[3], app);
    draw_urgency(frame, chunks[4], app);
}

/// Step 3: recap, optional photos and consent
pub fn draw_confirmation(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Confirmation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Recap
            Constraint::Length(3), // Photos
            Constraint::Length(3), // Consent
        ])
        .margin(1)
        .split(area);

    draw_recap(frame, chunks[0], app);
    draw_text_field(
        frame,
        chunks[1],
        app,
        Field::Photos,
        "Photos (optionnel, chemins séparés par des virgules)",
    );
    draw_consent(frame, chunks[2], app);
}

fn draw_recap(frame: &mut Frame, area: Rect, app: &App) {
    let wizard = &app.wizard;
    let label_style = Style::default().fg(Color::DarkGray);

    let recap_line = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<14}"), label_style),
            Span::raw(value),
        ])
    };

    let services = wizard
        .selected_services
        .iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(", ");

    let lines = vec![
        recap_line("Nom", wizard.name.clone()),
        recap_line("Email", wizard.email.clone()),
        recap_line("Téléphone", wizard.phone.clone()),
        recap_line("Adresse", wizard.address.clone()),
        recap_line(
            "Type de bien",
            wizard
                .property_type
                .map(|t| t.label().to_string())
                .unwrap_or_default(),
        ),
        recap_line("Surface", format!("{} m²", wizard.surface)),
        recap_line("Services", services),
        recap_line(
            "Urgence",
            wizard
                .urgency
                .map(|u| u.label().to_string())
                .unwrap_or_default(),
        ),
    ];

    let block = Block::default()
        .title(" Récapitulatif de votre demande ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_consent(frame: &mut Frame, area: Rect, app: &App) {
    let marker = if app.wizard.consent { "[x]" } else { "[ ]" };
    let style = if app.wizard.consent {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let content = Paragraph::new(Line::from(Span::styled(
        format!("{marker} J'accepte que mes données soient utilisées pour traiter ma demande.*"),
        style,
    )))
    .wrap(Wrap { trim: false });

    frame.render_widget(
        content.block(field_block(app, Field::Consent, "Consentement (Espace)")),
        area,
    );
}

/// Success view shown once the submission completed
pub fn draw_success(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✓ Demande envoyée avec succès!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Nous avons bien reçu votre demande de devis."),
        Line::from("Notre équipe vous contactera dans les plus brefs délais."),
        Line::from(""),
    ];

    if let Some(receipt) = &app.last_receipt {
        lines.push(Line::from(vec![
            Span::styled("Référence : ", Style::default().fg(Color::DarkGray)),
            Span::raw(receipt.reference.clone()),
        ]));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::raw("Appuyez sur "),
        Span::styled(
            "Entrée",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" pour faire une nouvelle demande"),
    ]));

    let block = Block::default()
        .title(" Confirmation ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .block(block),
        area,
    );
}
