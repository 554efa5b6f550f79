//! Quote-request wizard state machine
//!
//! Owns step position, field values, per-field validation errors and the
//! submission lifecycle flags. Validation is pure; transitions write errors
//! and gate step changes. The UI layer only reads this state and dispatches
//! edits through the typed setters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// The three sequential stages of the quote-request wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    PersonalInfo,
    ProjectDetails,
    Confirmation,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [
        Self::PersonalInfo,
        Self::ProjectDetails,
        Self::Confirmation,
    ];

    /// 1-based position, used by the progress header
    pub fn number(&self) -> usize {
        match self {
            Self::PersonalInfo => 1,
            Self::ProjectDetails => 2,
            Self::Confirmation => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PersonalInfo => "Vos informations",
            Self::ProjectDetails => "Détails du projet",
            Self::Confirmation => "Confirmation",
        }
    }

    fn next(&self) -> Option<Self> {
        match self {
            Self::PersonalInfo => Some(Self::ProjectDetails),
            Self::ProjectDetails => Some(Self::Confirmation),
            Self::Confirmation => None,
        }
    }

    fn prev(&self) -> Option<Self> {
        match self {
            Self::PersonalInfo => None,
            Self::ProjectDetails => Some(Self::PersonalInfo),
            Self::Confirmation => Some(Self::ProjectDetails),
        }
    }
}

/// Identifies a wizard field, used as the key of the error map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Address,
    PropertyType,
    Surface,
    Description,
    Services,
    Urgency,
    Photos,
    Consent,
}

/// Property type catalog (step 2 select)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    House,
    Apartment,
    Office,
    Cellar,
    Garden,
    Construction,
    Other,
}

impl PropertyType {
    pub const ALL: [PropertyType; 7] = [
        Self::House,
        Self::Apartment,
        Self::Office,
        Self::Cellar,
        Self::Garden,
        Self::Construction,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::House => "Maison",
            Self::Apartment => "Appartement",
            Self::Office => "Bureau",
            Self::Cellar => "Cave/Grenier",
            Self::Garden => "Jardin",
            Self::Construction => "Après chantier",
            Self::Other => "Autre",
        }
    }
}

/// Urgency catalog (step 2 radio group)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Normal,
    Urgent,
    Flexible,
}

impl Urgency {
    pub const ALL: [Urgency; 3] = [Self::Normal, Self::Urgent, Self::Flexible];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Sous 1 semaine",
            Self::Urgent => "Sous 48h",
            Self::Flexible => "Date flexible",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            Self::Normal => "Standard",
            Self::Urgent => "Supplément urgent",
            Self::Flexible => "Meilleur prix",
        }
    }
}

/// Service catalog (step 2 checkboxes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    FullClearance,
    PostClearanceCleaning,
    SortingRecycling,
    AfterDeathCleaning,
    ObjectRemoval,
    Other,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 6] = [
        Self::FullClearance,
        Self::PostClearanceCleaning,
        Self::SortingRecycling,
        Self::AfterDeathCleaning,
        Self::ObjectRemoval,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullClearance => "Débarras complet",
            Self::PostClearanceCleaning => "Nettoyage après débarras",
            Self::SortingRecycling => "Tri et recyclage",
            Self::AfterDeathCleaning => "Nettoyage après décès",
            Self::ObjectRemoval => "Déménagement des objets",
            Self::Other => "Autre",
        }
    }
}

/// The quote-request wizard state
///
/// Created with all fields empty and step 1 active. Mutated exclusively
/// through the methods below; the UI never writes into it directly.
#[derive(Debug, Clone, Default)]
pub struct QuoteWizard {
    pub step: WizardStep,

    // Step 1: personal info
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,

    // Step 2: project details
    pub property_type: Option<PropertyType>,
    pub surface: String,
    pub description: String,
    pub selected_services: Vec<ServiceKind>,
    pub urgency: Option<Urgency>,

    // Step 3: confirmation
    pub photos: String,
    pub consent: bool,

    // Validation and submission lifecycle
    pub errors: HashMap<Field, String>,
    pub submit_error: Option<String>,
    pub is_submitting: bool,
    pub submit_success: bool,
}

impl QuoteWizard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a text-backed field, clearing its error if present.
    /// No validation runs here; that is deferred to the step gates.
    pub fn update_text(&mut self, field: Field, value: String) {
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Phone => self.phone = value,
            Field::Address => self.address = value,
            Field::Surface => self.surface = value,
            Field::Description => self.description = value,
            Field::Photos => self.photos = value,
            // Not text-backed; use the typed setters
            Field::PropertyType | Field::Services | Field::Urgency | Field::Consent => return,
        }
        self.errors.remove(&field);
    }

    /// Append a character to a text-backed field
    pub fn input_char(&mut self, field: Field, c: char) {
        if let Some(current) = self.text_value(field) {
            let mut value = current.to_string();
            value.push(c);
            self.update_text(field, value);
        }
    }

    /// Remove the last character from a text-backed field
    pub fn backspace(&mut self, field: Field) {
        if let Some(current) = self.text_value(field) {
            let mut value = current.to_string();
            value.pop();
            self.update_text(field, value);
        }
    }

    /// Current value of a text-backed field, None for selects/toggles
    pub fn text_value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Email => Some(&self.email),
            Field::Phone => Some(&self.phone),
            Field::Address => Some(&self.address),
            Field::Surface => Some(&self.surface),
            Field::Description => Some(&self.description),
            Field::Photos => Some(&self.photos),
            Field::PropertyType | Field::Services | Field::Urgency | Field::Consent => None,
        }
    }

    pub fn set_property_type(&mut self, property_type: PropertyType) {
        self.property_type = Some(property_type);
        self.errors.remove(&Field::PropertyType);
    }

    pub fn set_urgency(&mut self, urgency: Urgency) {
        self.urgency = Some(urgency);
        self.errors.remove(&Field::Urgency);
    }

    pub fn set_consent(&mut self, consent: bool) {
        self.consent = consent;
        self.errors.remove(&Field::Consent);
    }

    /// Toggle membership of a service in the selected set.
    /// Toggling the same service twice restores the original set.
    pub fn toggle_service(&mut self, service: ServiceKind) {
        if let Some(pos) = self.selected_services.iter().position(|s| *s == service) {
            self.selected_services.remove(pos);
        } else {
            self.selected_services.push(service);
        }
        self.errors.remove(&Field::Services);
    }

    pub fn is_service_selected(&self, service: ServiceKind) -> bool {
        self.selected_services.contains(&service)
    }

    /// Validate one step. Pure: reads state, returns the error map,
    /// writes nothing. Empty map means the step is valid.
    pub fn validate_step(&self, step: WizardStep) -> HashMap<Field, String> {
        let mut errors = HashMap::new();

        match step {
            WizardStep::PersonalInfo => {
                if self.name.trim().is_empty() {
                    errors.insert(Field::Name, "Le nom est requis".to_string());
                }
                if self.email.trim().is_empty() {
                    errors.insert(Field::Email, "L'email est requis".to_string());
                } else if !email_shape_ok(&self.email) {
                    errors.insert(Field::Email, "Email invalide".to_string());
                }
                if self.phone.trim().is_empty() {
                    errors.insert(Field::Phone, "Le téléphone est requis".to_string());
                } else if !phone_shape_ok(&self.phone) {
                    errors.insert(Field::Phone, "Numéro invalide".to_string());
                }
                if self.address.trim().is_empty() {
                    errors.insert(Field::Address, "L'adresse est requise".to_string());
                }
            }
            WizardStep::ProjectDetails => {
                if self.property_type.is_none() {
                    errors.insert(
                        Field::PropertyType,
                        "Veuillez sélectionner un type de bien".to_string(),
                    );
                }
                if self.surface.trim().is_empty() {
                    errors.insert(Field::Surface, "La surface est requise".to_string());
                } else {
                    match self.surface.trim().parse::<f64>() {
                        Err(_) => {
                            errors.insert(
                                Field::Surface,
                                "La surface doit être un nombre".to_string(),
                            );
                        }
                        // NaN also lands here: it is not greater than zero
                        Ok(n) if !(n > 0.0) => {
                            errors.insert(
                                Field::Surface,
                                "La surface doit être positive".to_string(),
                            );
                        }
                        Ok(_) => {}
                    }
                }
                if self.description.trim().is_empty() {
                    errors.insert(Field::Description, "La description est requise".to_string());
                }
                if self.selected_services.is_empty() {
                    errors.insert(
                        Field::Services,
                        "Veuillez sélectionner au moins un service".to_string(),
                    );
                }
                if self.urgency.is_none() {
                    errors.insert(
                        Field::Urgency,
                        "Veuillez sélectionner un niveau d'urgence".to_string(),
                    );
                }
            }
            WizardStep::Confirmation => {
                if !self.consent {
                    errors.insert(
                        Field::Consent,
                        "Vous devez accepter les conditions".to_string(),
                    );
                }
            }
        }

        errors
    }

    /// Move to the next step if the current one validates.
    /// On failure the errors are written and the step does not change.
    /// Returns true on transition.
    pub fn advance(&mut self) -> bool {
        let errors = self.validate_step(self.step);
        if !errors.is_empty() {
            self.errors = errors;
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.errors.clear();
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Move back one step, unconditionally
    pub fn retreat(&mut self) -> bool {
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    /// Gate and start a submission. Runs the step-3 validation; on failure
    /// writes the errors and returns false. A submission already in flight
    /// also returns false. On success `is_submitting` is set and the caller
    /// is expected to dispatch the actual request.
    pub fn begin_submit(&mut self) -> bool {
        if self.is_submitting {
            return false;
        }
        let errors = self.validate_step(WizardStep::Confirmation);
        if !errors.is_empty() {
            self.errors = errors;
            return false;
        }
        self.errors.clear();
        self.submit_error = None;
        self.is_submitting = true;
        true
    }

    /// Record a successful submission: the success flag is raised and the
    /// field state returns to its initial defaults.
    pub fn complete_submit(&mut self) {
        *self = Self::default();
        self.submit_success = true;
    }

    /// Record a failed submission: the wizard stays on the confirmation
    /// step with all entered values intact, and the error is retryable.
    pub fn fail_submit(&mut self, message: impl Into<String>) {
        self.is_submitting = false;
        self.submit_error = Some(message.into());
    }

    /// Dismiss a submission failure message
    pub fn dismiss_submit_error(&mut self) {
        self.submit_error = None;
    }

    /// Return to the initial state (used by the success view's
    /// "new request" action)
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Matches the `local@domain.tld` shape: no whitespace, a single `@` with a
/// non-empty local part, and a domain with non-empty labels around its last dot
fn email_shape_ok(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Digits, spaces, `+` and `-` only
fn phone_shape_ok(phone: &str) -> bool {
    phone
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '+' || c == '-')
}
