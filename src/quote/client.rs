//! Quote submission client
//!
//! Holds the request/receipt types exchanged with the quote service and the
//! simulated implementation used until a real backend exists. The simulated
//! client stands in for a network round trip with a fixed delay and always
//! succeeds.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::traits::QuoteService;
use crate::state::{PropertyType, QuoteWizard, ServiceKind, Urgency};

/// Default simulated round-trip delay
pub const DEFAULT_SUBMIT_DELAY_MS: u64 = 2000;

/// Submission failure taxonomy. The simulated client never produces these;
/// a real transport maps its timeouts and rejections onto them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("the quote service did not answer in time")]
    Timeout,
    #[error("the quote service rejected the request: {0}")]
    Rejected(String),
    #[error("the quote service is unreachable: {0}")]
    Unreachable(String),
}

/// A validated quote request, built from the wizard once every step gate
/// has passed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub property_type: PropertyType,
    pub surface_m2: f64,
    pub description: String,
    pub services: Vec<ServiceKind>,
    pub urgency: Urgency,
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl QuoteRequest {
    /// Build a request from the wizard state. Returns None when a catalog
    /// field is unset or the surface does not parse, which the step gates
    /// rule out before submission.
    pub fn from_wizard(wizard: &QuoteWizard) -> Option<Self> {
        let surface_m2 = wizard.surface.trim().parse::<f64>().ok()?;
        Some(Self {
            name: wizard.name.clone(),
            email: wizard.email.clone(),
            phone: wizard.phone.clone(),
            address: wizard.address.clone(),
            property_type: wizard.property_type?,
            surface_m2,
            description: wizard.description.clone(),
            services: wizard.selected_services.clone(),
            urgency: wizard.urgency?,
            photos: wizard
                .photos
                .split([',', ' '])
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            created_at: Utc::now(),
        })
    }
}

/// Receipt returned by the quote service on success
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteReceipt {
    /// Reference the customer can quote back to the team
    pub reference: String,
    pub received_at: DateTime<Utc>,
}

/// Simulated quote service: sleeps for a fixed delay, then succeeds
pub struct SimulatedQuoteService {
    delay: Duration,
}

impl SimulatedQuoteService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedQuoteService {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS))
    }
}

#[async_trait]
impl QuoteService for SimulatedQuoteService {
    async fn submit_quote(&self, request: QuoteRequest) -> Result<QuoteReceipt, QuoteError> {
        tracing::info!(
            name = %request.name,
            services = request.services.len(),
            "submitting quote request (simulated)"
        );
        tokio::time::sleep(self.delay).await;
        let receipt = QuoteReceipt {
            reference: Uuid::new_v4().to_string(),
            received_at: Utc::now(),
        };
        tracing::info!(reference = %receipt.reference, "quote request accepted (simulated)");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Field;
    use pretty_assertions::assert_eq;

    fn submittable_wizard() -> QuoteWizard {
        let mut wizard = QuoteWizard::new();
        wizard.update_text(Field::Name, "Jean Martin".to_string());
        wizard.update_text(Field::Email, "jean@example.fr".to_string());
        wizard.update_text(Field::Phone, "0612345678".to_string());
        wizard.update_text(Field::Address, "5 avenue des Lilas".to_string());
        wizard.set_property_type(PropertyType::House);
        wizard.update_text(Field::Surface, "120".to_string());
        wizard.update_text(Field::Description, "Grenier à débarrasser".to_string());
        wizard.toggle_service(ServiceKind::FullClearance);
        wizard.toggle_service(ServiceKind::SortingRecycling);
        wizard.set_urgency(Urgency::Urgent);
        wizard.set_consent(true);
        wizard
    }

    mod request_mapping {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn from_wizard_maps_all_fields() {
            let wizard = submittable_wizard();
            let request = QuoteRequest::from_wizard(&wizard).unwrap();
            assert_eq!(request.name, "Jean Martin");
            assert_eq!(request.property_type, PropertyType::House);
            assert_eq!(request.surface_m2, 120.0);
            assert_eq!(
                request.services,
                vec![ServiceKind::FullClearance, ServiceKind::SortingRecycling]
            );
            assert_eq!(request.urgency, Urgency::Urgent);
            assert!(request.photos.is_empty());
        }

        #[test]
        fn from_wizard_splits_photo_paths() {
            let mut wizard = submittable_wizard();
            wizard.update_text(Field::Photos, "cave.jpg, grenier.png".to_string());
            let request = QuoteRequest::from_wizard(&wizard).unwrap();
            assert_eq!(request.photos, vec!["cave.jpg", "grenier.png"]);
        }

        #[test]
        fn from_wizard_requires_catalog_fields() {
            let mut wizard = submittable_wizard();
            wizard.property_type = None;
            assert!(QuoteRequest::from_wizard(&wizard).is_none());

            let mut wizard = submittable_wizard();
            wizard.urgency = None;
            assert!(QuoteRequest::from_wizard(&wizard).is_none());
        }

        #[test]
        fn from_wizard_requires_numeric_surface() {
            let mut wizard = submittable_wizard();
            wizard.update_text(Field::Surface, "beaucoup".to_string());
            assert!(QuoteRequest::from_wizard(&wizard).is_none());
        }

        #[test]
        fn request_serializes_to_json() {
            let wizard = submittable_wizard();
            let request = QuoteRequest::from_wizard(&wizard).unwrap();
            let json = serde_json::to_string(&request).unwrap();
            assert!(json.contains("\"property_type\":\"house\""));
            assert!(json.contains("\"urgency\":\"urgent\""));
        }
    }

    mod simulated_service {
        use super::*;
        use pretty_assertions::assert_eq;
        use tokio_test::assert_ok;

        #[tokio::test(start_paused = true)]
        async fn resolves_to_success_after_delay() {
            let service = SimulatedQuoteService::new(Duration::from_millis(1500));
            let request = QuoteRequest::from_wizard(&submittable_wizard()).unwrap();

            let started = tokio::time::Instant::now();
            let receipt = tokio_test::assert_ok!(service.submit_quote(request).await);

            assert!(started.elapsed() >= Duration::from_millis(1500));
            assert!(!receipt.reference.is_empty());
        }

        #[test]
        fn error_messages_are_descriptive() {
            assert_eq!(
                QuoteError::Unreachable("connexion refusée".to_string()).to_string(),
                "the quote service is unreachable: connexion refusée"
            );
            assert_eq!(
                QuoteError::Timeout.to_string(),
                "the quote service did not answer in time"
            );
            assert_eq!(
                QuoteError::Rejected("zone non desservie".to_string()).to_string(),
                "the quote service rejected the request: zone non desservie"
            );
        }
    }
}
