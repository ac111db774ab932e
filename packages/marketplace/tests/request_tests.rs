//! Integration tests for the request feed, detail page and deletion.

mod common;

use common::{offer_by, request_owned_by, TestHarness, BUYER_PHONE, SELLER_PHONE};
use marketplace_core::common::{RequestId, UserId};
use marketplace_core::domains::catalog::Category;
use marketplace_core::domains::favorites::actions::toggle;
use marketplace_core::domains::requests::actions::{
    browse_requests, create_request, delete_request, load_request_detail,
};
use marketplace_core::domains::requests::models::{
    attach_images, ImageAttachment, RequestDetails, RequestFilter,
};
use marketplace_core::kernel::StoreOp;
use marketplace_core::MarketError;
use test_context::test_context;

fn seed_feed(ctx: &TestHarness) -> UserId {
    let owner = UserId::new();
    let mut moscow = request_owned_by(owner, "Ищу iPhone 15", Category::Electronics);
    moscow.city = Some("Москва".to_string());
    let mut kazan = request_owned_by(owner, "Нужен репетитор", Category::Education);
    kazan.city = Some("Казань".to_string());
    let anywhere = request_owned_by(owner, "Куплю диван", Category::Furniture);

    ctx.store().seed_request(moscow);
    ctx.store().seed_request(kazan);
    ctx.store().seed_request(anywhere);
    owner
}

fn titles(requests: &[marketplace_core::domains::requests::models::Request]) -> Vec<&str> {
    requests.iter().map(|r| r.title.as_str()).collect()
}

#[test_context(TestHarness)]
#[tokio::test]
async fn feed_is_newest_first_without_filters(ctx: &mut TestHarness) {
    seed_feed(ctx);

    let feed = browse_requests(&RequestFilter::default(), &ctx.deps)
        .await
        .unwrap();

    assert_eq!(
        titles(&feed),
        vec!["Куплю диван", "Нужен репетитор", "Ищу iPhone 15"]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn city_filter_keeps_requests_without_a_city(ctx: &mut TestHarness) {
    seed_feed(ctx);

    let filter = RequestFilter::from_labels("Все", "Казань", "");
    let feed = browse_requests(&filter, &ctx.deps).await.unwrap();

    assert_eq!(titles(&feed), vec!["Куплю диван", "Нужен репетитор"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn category_and_search_narrow_the_feed(ctx: &mut TestHarness) {
    seed_feed(ctx);

    let filter = RequestFilter::from_labels("Электроника", "Россия, все города", "iphone");
    let feed = browse_requests(&filter, &ctx.deps).await.unwrap();
    assert_eq!(titles(&feed), vec!["Ищу iPhone 15"]);

    let filter = RequestFilter::from_labels("Все", "", "РЕПЕТИТОР");
    let feed = browse_requests(&filter, &ctx.deps).await.unwrap();
    assert_eq!(titles(&feed), vec!["Нужен репетитор"]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_request_stores_images_and_owner(ctx: &mut TestHarness) {
    let me = ctx.sign_in_as(BUYER_PHONE).await;
    let mut images = Vec::new();
    attach_images(
        &mut images,
        vec![ImageAttachment::from_bytes("image/png", &[1, 2, 3]).unwrap()],
    )
    .unwrap();

    let details = RequestDetails::new("Ищу велосипед", "Горный, 26 дюймов", "Хобби и отдых")
        .with_budget("до 20 000 ₽")
        .with_images(images);
    let request = create_request(&details, &ctx.auth, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(request.user_id, me.id);
    assert_eq!(request.category, Category::HobbiesAndLeisure);
    assert_eq!(request.budget.as_deref(), Some("до 20 000 ₽"));
    assert_eq!(
        request.images,
        vec!["data:image/png;base64,AQID".to_string()]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn create_request_requires_sign_in(ctx: &mut TestHarness) {
    let details = RequestDetails::new("Ищу", "срочно", "Авто");
    let err = create_request(&details, &ctx.auth, &ctx.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::AuthenticationRequired));
    assert_eq!(ctx.store().calls(StoreOp::RequestInsert), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn detail_for_anonymous_viewer(ctx: &mut TestHarness) {
    let owner = UserId::new();
    let request = request_owned_by(owner, "Ищу iPhone", Category::Electronics);
    ctx.store().seed_request(request.clone());
    let older = offer_by(UserId::new(), &request);
    let newer = offer_by(UserId::new(), &request);
    ctx.store().seed_offer(older.clone());
    ctx.store().seed_offer(newer.clone());

    let detail = load_request_detail(request.id, &ctx.auth, &ctx.deps)
        .await
        .unwrap();

    assert_eq!(detail.request, request);
    assert_eq!(detail.offers, vec![newer, older]);
    assert!(!detail.is_favorite);
    assert!(!detail.is_owner);
    assert_eq!(ctx.store().calls(StoreOp::FavoriteExists), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_request_is_not_found(ctx: &mut TestHarness) {
    let err = load_request_detail(RequestId::new(), &ctx.auth, &ctx.deps)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Запрос: не найдено");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn owners_delete_their_requests_with_offers_and_favorites(ctx: &mut TestHarness) {
    let me = ctx.sign_in_as(BUYER_PHONE).await;
    let request = request_owned_by(me.id, "Ищу iPhone", Category::Electronics);
    ctx.store().seed_request(request.clone());
    ctx.store().seed_offer(offer_by(UserId::new(), &request));
    toggle(UserId::new(), request.id, &ctx.deps).await.unwrap();

    let detail = load_request_detail(request.id, &ctx.auth, &ctx.deps)
        .await
        .unwrap();
    assert!(detail.is_owner);

    delete_request(request.id, &ctx.auth, &ctx.deps)
        .await
        .unwrap();

    assert!(ctx.store().requests().is_empty());
    assert!(ctx.store().offers().is_empty());
    assert!(ctx.store().favorites().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn others_cannot_delete_a_request(ctx: &mut TestHarness) {
    ctx.sign_in_as(SELLER_PHONE).await;
    let request = request_owned_by(UserId::new(), "Ищу iPhone", Category::Electronics);
    ctx.store().seed_request(request.clone());

    let err = delete_request(request.id, &ctx.auth, &ctx.deps)
        .await
        .unwrap_err();

    assert!(matches!(err, MarketError::PermissionDenied(_)));
    assert_eq!(ctx.store().calls(StoreOp::RequestDelete), 0);
    assert_eq!(ctx.store().requests(), vec![request]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn feed_failure_is_translated(ctx: &mut TestHarness) {
    ctx.store()
        .fail_on(StoreOp::RequestList, "network error: connection refused");

    let err = browse_requests(&RequestFilter::default(), &ctx.deps)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Не удалось загрузить запросы: Ошибка подключения. Проверьте интернет соединение"
    );
}
