//! Sample data for `--demo`.

use chrono::{Duration, Utc};
use marketplace_core::common::{OfferId, RequestId, UserId};
use marketplace_core::domains::catalog::Category;
use marketplace_core::domains::offers::models::Offer;
use marketplace_core::domains::profiles::models::Profile;
use marketplace_core::domains::requests::models::Request;
use marketplace_core::kernel::TestDependencies;

pub fn seed(mocks: &TestDependencies) {
    let buyer = UserId::new();
    let seller = UserId::new();
    let now = Utc::now();

    mocks.store.seed_profile(Profile {
        id: buyer,
        name: "Мария".to_string(),
        phone: "+79990000001".to_string(),
        email: None,
        city: Some("Москва".to_string()),
    });

    let samples = [
        (
            "Ищу iPhone 15 Pro",
            "Только новый, в плёнке",
            Category::Electronics,
            Some("Москва"),
            26,
        ),
        (
            "Нужен логотип для кофейни",
            "Минимализм, 3 варианта",
            Category::Design,
            None,
            5,
        ),
        (
            "Куплю детскую коляску",
            "2 в 1, не старше 2 лет",
            Category::KidsGoods,
            Some("Казань"),
            1,
        ),
    ];

    for (title, description, category, city, hours_ago) in samples {
        let request = Request {
            id: RequestId::new(),
            user_id: buyer,
            title: title.to_string(),
            description: description.to_string(),
            category,
            budget: None,
            city: city.map(str::to_string),
            deadline: None,
            images: Vec::new(),
            created_at: now - Duration::hours(hours_ago),
        };

        if category == Category::Electronics {
            mocks.store.seed_offer(Offer {
                id: OfferId::new(),
                request_id: request.id,
                user_id: seller,
                company: "re:Store".to_string(),
                price: "119 990 ₽".to_string(),
                description: "В наличии, самовывоз сегодня".to_string(),
                contact: "+74950000000".to_string(),
                created_at: now - Duration::hours(2),
            });
        }
        mocks.store.seed_request(request);
    }
}
