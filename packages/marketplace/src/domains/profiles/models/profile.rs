use serde::{Deserialize, Serialize};

use crate::common::text::null_as_default;
use crate::common::{non_blank, UserId};

/// Name given to profiles created automatically after phone verification.
pub const PLACEHOLDER_NAME: &str = "Пользователь";

/// User metadata, one-to-one with an auth user (`id` is the user id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl Profile {
    /// Profile created on first successful phone verification.
    pub fn placeholder(id: UserId, phone: &str, city: Option<&str>) -> Self {
        Self {
            id,
            name: PLACEHOLDER_NAME.to_string(),
            phone: phone.trim().to_string(),
            email: None,
            city: city.and_then(non_blank),
        }
    }

    /// Contact string used to prefill the offer form:
    /// `"phone, email"`, or whichever of the two is present.
    pub fn contact_line(&self) -> Option<String> {
        let phone = non_blank(&self.phone);
        let email = self.email.as_deref().and_then(non_blank);

        match (phone, email) {
            (Some(phone), Some(email)) => Some(format!("{}, {}", phone, email)),
            (Some(phone), None) => Some(phone),
            (None, Some(email)) => Some(email),
            (None, None) => None,
        }
    }
}

/// Partial profile update. Unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl ProfileUpdate {
    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Default::default()
        }
    }

    pub fn apply(&self, profile: &mut Profile) {
        if let Some(name) = &self.name {
            profile.name = name.clone();
        }
        if let Some(phone) = &self.phone {
            profile.phone = phone.clone();
        }
        if let Some(email) = &self.email {
            profile.email = non_blank(email);
        }
        if let Some(city) = &self.city {
            profile.city = non_blank(city);
        }
    }
}

/// Settings form state. Every field is plain text; blank means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub city: String,
}

impl ProfileForm {
    /// Build the form from the stored profile. The auth email wins over the
    /// profile copy because it is the one used for sign-in.
    pub fn from_profile(profile: Option<&Profile>, auth_email: Option<&str>) -> Self {
        let auth_email = auth_email.and_then(non_blank);

        match profile {
            Some(profile) => Self {
                name: profile.name.clone(),
                phone: profile.phone.clone(),
                email: auth_email
                    .or_else(|| profile.email.clone())
                    .unwrap_or_default(),
                city: profile.city.clone().unwrap_or_default(),
            },
            None => Self {
                email: auth_email.unwrap_or_default(),
                ..Default::default()
            },
        }
    }

    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            name: Some(self.name.trim().to_string()),
            phone: Some(self.phone.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            city: Some(self.city.trim().to_string()),
        }
    }
}
