use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{is_blank, OfferId, RequestId, UserId};
use crate::domains::profiles::models::Profile;
use crate::error::{RequiredField, ValidationError};

/// A seller's answer to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: OfferId,
    pub request_id: RequestId,
    pub user_id: UserId,
    pub company: String,
    pub price: String,
    pub description: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOffer {
    pub request_id: RequestId,
    pub user_id: UserId,
    pub company: String,
    pub price: String,
    pub description: String,
    pub contact: String,
}

/// Offer form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferForm {
    pub company: String,
    pub price: String,
    pub description: String,
    pub contact: String,
}

impl OfferForm {
    /// Form prefilled from the seller's profile: name as company and the
    /// profile contact line.
    pub fn prefilled(profile: Option<&Profile>) -> Self {
        match profile {
            Some(profile) => Self {
                company: profile.name.clone(),
                contact: profile.contact_line().unwrap_or_default(),
                ..Default::default()
            },
            None => Self::default(),
        }
    }

    pub fn missing_fields(&self) -> Vec<RequiredField> {
        [
            (RequiredField::Company, &self.company),
            (RequiredField::Price, &self.price),
            (RequiredField::Description, &self.description),
            (RequiredField::Contact, &self.contact),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(field, _)| field)
        .collect()
    }

    pub fn to_new_offer(
        &self,
        request_id: RequestId,
        user_id: UserId,
    ) -> Result<NewOffer, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        Ok(NewOffer {
            request_id,
            user_id,
            company: self.company.trim().to_string(),
            price: self.price.trim().to_string(),
            description: self.description.trim().to_string(),
            contact: self.contact.trim().to_string(),
        })
    }
}

/// First offer in `offers` made by `user_id`.
pub fn find_offer_by<'a>(offers: &'a [Offer], user_id: UserId) -> Option<&'a Offer> {
    offers.iter().find(|offer| offer.user_id == user_id)
}
