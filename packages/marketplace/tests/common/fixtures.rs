//! Test fixtures for creating test data.

use chrono::Utc;
use marketplace_core::common::{OfferId, RequestId, UserId};
use marketplace_core::domains::catalog::Category;
use marketplace_core::domains::offers::models::{Offer, OfferForm};
use marketplace_core::domains::profiles::models::Profile;
use marketplace_core::domains::requests::models::{Request, RequestDetails};

pub const BUYER_PHONE: &str = "+79991234567";
pub const SELLER_PHONE: &str = "+79997654321";

/// The iPhone request used throughout the flow tests
pub fn iphone_details() -> RequestDetails {
    RequestDetails::new("Ищу iPhone", "срочно", "Электроника")
}

pub fn request_owned_by(user_id: UserId, title: &str, category: Category) -> Request {
    Request {
        id: RequestId::new(),
        user_id,
        title: title.to_string(),
        description: format!("{} в хорошем состоянии", title),
        category,
        budget: None,
        city: None,
        deadline: None,
        images: Vec::new(),
        created_at: Utc::now(),
    }
}

pub fn offer_by(user_id: UserId, request: &Request) -> Offer {
    Offer {
        id: OfferId::new(),
        request_id: request.id,
        user_id,
        company: "ООО Ромашка".to_string(),
        price: "90 000 ₽".to_string(),
        description: "Новый, с гарантией".to_string(),
        contact: "+79990001122".to_string(),
        created_at: Utc::now(),
    }
}

pub fn complete_offer_form() -> OfferForm {
    OfferForm {
        company: "ИП Петров".to_string(),
        price: "85 000 ₽".to_string(),
        description: "В наличии, доставка завтра".to_string(),
        contact: "@petrov".to_string(),
    }
}

pub fn profile_for(user_id: UserId, name: &str, city: Option<&str>) -> Profile {
    Profile {
        id: user_id,
        name: name.to_string(),
        phone: "+79990000000".to_string(),
        email: None,
        city: city.map(str::to_string),
    }
}
