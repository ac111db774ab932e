use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::text::null_as_default;
use crate::common::{is_blank, non_blank, RequestId, UserId};
use crate::domains::catalog::Category;
use crate::error::{RequiredField, ValidationError};

use super::images::MAX_IMAGES;

/// A buyer's want-ad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    /// Image URLs or data URIs, at most five.
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Request {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// Insert payload for the `requests` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRequest {
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub budget: Option<String>,
    pub city: Option<String>,
    pub deadline: Option<String>,
    /// NULL rather than an empty array when there are no images.
    pub images: Option<Vec<String>>,
}

/// Request form state as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDetails {
    pub title: String,
    pub description: String,
    pub category: String,
    pub budget: String,
    pub city: String,
    pub deadline: String,
    pub images: Vec<String>,
}

impl RequestDetails {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn with_budget(mut self, budget: impl Into<String>) -> Self {
        self.budget = budget.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = deadline.into();
        self
    }

    pub fn with_images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    /// Required fields that are blank, in form order.
    pub fn missing_fields(&self) -> Vec<RequiredField> {
        [
            (RequiredField::Title, &self.title),
            (RequiredField::Description, &self.description),
            (RequiredField::Category, &self.category),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(field, _)| field)
        .collect()
    }

    /// City typed into the form, if any.
    pub fn city(&self) -> Option<String> {
        non_blank(&self.city)
    }

    /// Full local validation: required fields, known category, image count.
    pub fn validate(&self) -> Result<Category, ValidationError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let category: Category = self.category.parse()?;

        if self.images.len() > MAX_IMAGES {
            return Err(ValidationError::TooManyImages {
                count: self.images.len(),
                max: MAX_IMAGES,
            });
        }

        Ok(category)
    }

    /// Validated insert payload owned by `user_id`.
    pub fn to_new_request(&self, user_id: UserId) -> Result<NewRequest, ValidationError> {
        let category = self.validate()?;

        Ok(NewRequest {
            user_id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category,
            budget: non_blank(&self.budget),
            city: non_blank(&self.city),
            deadline: non_blank(&self.deadline),
            images: (!self.images.is_empty()).then(|| self.images.clone()),
        })
    }
}
