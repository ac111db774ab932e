//! Integration tests for the phone verification flow.
//!
//! Covers the details → code → profile → request path, its failure modes and
//! the resend countdown.

mod common;

use std::time::Duration;

use common::{iphone_details, TestHarness, BUYER_PHONE};
use marketplace_core::domains::auth::models::AuthContext;
use marketplace_core::domains::catalog::Category;
use marketplace_core::domains::profiles::actions::ProfileWrite;
use marketplace_core::domains::requests::models::{
    attach_images, mime_for_file, ImageAttachment, RequestDetails,
};
use marketplace_core::domains::verification::{FlowPhase, ResendOutcome, VerificationFlow};
use marketplace_core::error::RequiredField;
use marketplace_core::kernel::{MockIdentityGateway, StoreOp, DEMO_CODE};
use marketplace_core::{MarketError, ValidationError};
use proptest::prelude::*;
use test_context::test_context;

fn missing(err: &MarketError) -> Vec<RequiredField> {
    match err {
        MarketError::Validation(v) => v.missing_fields().to_vec(),
        other => panic!("expected a validation error, got {:?}", other),
    }
}

// ============================================================================
// request_code
// ============================================================================

#[tokio::test(start_paused = true)]
async fn request_code_moves_to_awaiting_code_with_full_countdown() {
    let harness = TestHarness::new();
    let mut flow = harness.flow();

    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();

    assert_eq!(flow.phase(), FlowPhase::AwaitingCode);
    assert_eq!(flow.countdown_remaining(), 60);
    assert_eq!(flow.pending_phone(), Some(BUYER_PHONE));
    assert_eq!(
        harness.identity().sent_codes(),
        vec![BUYER_PHONE.to_string()]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn blank_fields_are_reported_together_without_sending(ctx: &mut TestHarness) {
    let mut flow = ctx.flow();

    let err = flow
        .request_code(RequestDetails::new("", "  ", "Авто"), " ")
        .await
        .unwrap_err();

    assert_eq!(
        missing(&err),
        vec![
            RequiredField::Title,
            RequiredField::Description,
            RequiredField::Phone
        ]
    );
    assert_eq!(
        err.to_string(),
        "Пожалуйста, заполните: Название, Описание, Номер телефона"
    );
    assert_eq!(ctx.identity().send_count(), 0);
    assert_eq!(flow.phase(), FlowPhase::CollectingDetails);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_category_is_rejected_before_sending(ctx: &mut TestHarness) {
    let mut flow = ctx.flow();

    let err = flow
        .request_code(RequestDetails::new("Ищу", "срочно", "Космос"), BUYER_PHONE)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        MarketError::Validation(ValidationError::UnknownCategory(_))
    ));
    assert_eq!(ctx.identity().send_count(), 0);
}

#[tokio::test]
async fn send_failure_is_translated_and_keeps_collecting_details() {
    let harness = TestHarness::with_identity(
        MockIdentityGateway::new().with_send_failure("Invalid phone number"),
    );
    let mut flow = harness.flow();

    let err = flow
        .request_code(iphone_details(), "12345")
        .await
        .unwrap_err();

    match err {
        MarketError::CodeSend { reason } => assert_eq!(reason, "Некорректный номер телефона"),
        other => panic!("expected CodeSend, got {:?}", other),
    }
    assert_eq!(flow.phase(), FlowPhase::CollectingDetails);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn request_code_twice_is_an_invalid_state(ctx: &mut TestHarness) {
    let mut flow = ctx.flow();
    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();

    let err = flow
        .request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap_err();

    assert!(matches!(err, MarketError::InvalidState(_)));
    assert_eq!(ctx.identity().send_count(), 1);
}

// ============================================================================
// verify_code_and_create
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn verification_creates_request_owned_by_verified_user(ctx: &mut TestHarness) {
    let mut flow = ctx.flow();
    flow.request_code(iphone_details().with_city("Казань"), BUYER_PHONE)
        .await
        .unwrap();

    assert!(
        ctx.store().requests().is_empty(),
        "nothing before verification"
    );

    let outcome = flow
        .verify_code_and_create(DEMO_CODE, &mut ctx.auth)
        .await
        .unwrap();

    let verified = ctx.identity().user_for_phone(BUYER_PHONE).unwrap();
    assert_eq!(outcome.user.id, verified.id);
    assert_eq!(outcome.request.user_id, verified.id);
    assert_eq!(outcome.request.category, Category::Electronics);
    assert_eq!(outcome.request.city.as_deref(), Some("Казань"));
    assert_eq!(ctx.store().requests(), vec![outcome.request.clone()]);

    assert_eq!(flow.phase(), FlowPhase::Verified);
    assert_eq!(flow.request(), Some(&outcome.request));
    assert_eq!(ctx.auth.user_id(), Some(verified.id));

    match outcome.profile {
        ProfileWrite::Created(profile) => {
            assert_eq!(profile.name, "Пользователь");
            assert_eq!(profile.phone, BUYER_PHONE);
            assert_eq!(profile.city.as_deref(), Some("Казань"));
        }
        other => panic!("expected a new profile, got {:?}", other),
    }
}

#[tokio::test]
async fn rejected_code_stays_awaiting_and_creates_nothing() {
    let harness = TestHarness::with_identity(MockIdentityGateway::new().rejecting_codes());
    let mut flow = harness.flow();
    let mut auth = AuthContext::anonymous();

    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();
    let err = flow
        .verify_code_and_create("000000", &mut auth)
        .await
        .unwrap_err();

    assert!(matches!(err, MarketError::InvalidCode));
    assert_eq!(flow.phase(), FlowPhase::AwaitingCode);
    assert!(harness.store().requests().is_empty());
    assert!(harness.store().profiles().is_empty());
    assert!(!auth.is_authenticated());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn photos_picked_from_disk_are_published_with_the_request(ctx: &mut TestHarness) {
    let path = std::env::temp_dir().join(format!("needhub-{}.png", uuid_suffix()));
    tokio::fs::write(&path, [0x89, 0x50, 0x4e, 0x47])
        .await
        .unwrap();
    let path = path.to_string_lossy().to_string();

    let bytes = tokio::fs::read(&path).await.unwrap();
    let mut images = Vec::new();
    attach_images(
        &mut images,
        vec![ImageAttachment::from_bytes(mime_for_file(&path), &bytes).unwrap()],
    )
    .unwrap();
    tokio::fs::remove_file(&path).await.unwrap();

    let mut flow = ctx.flow();
    flow.request_code(iphone_details().with_images(images), BUYER_PHONE)
        .await
        .unwrap();
    let outcome = flow
        .verify_code_and_create(DEMO_CODE, &mut ctx.auth)
        .await
        .unwrap();

    assert_eq!(
        outcome.request.images,
        vec!["data:image/png;base64,iVBORw==".to_string()]
    );
    assert_eq!(ctx.store().requests()[0].images, outcome.request.images);
}

fn uuid_suffix() -> String {
    marketplace_core::common::UserId::new().to_string()
}

#[tokio::test]
async fn network_failure_during_check_is_not_a_wrong_code() {
    let harness = TestHarness::with_identity(
        MockIdentityGateway::new().with_verify_outage("network error: connection reset"),
    );
    let mut flow = harness.flow();
    let mut auth = AuthContext::anonymous();

    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();
    let err = flow
        .verify_code_and_create(DEMO_CODE, &mut auth)
        .await
        .unwrap_err();

    match &err {
        MarketError::Gateway { action, reason } => {
            assert_eq!(*action, "Ошибка проверки кода");
            assert_eq!(reason, "Ошибка подключения. Проверьте интернет соединение");
        }
        other => panic!("expected a gateway error, got {:?}", other),
    }
    assert_eq!(flow.phase(), FlowPhase::AwaitingCode);
    assert!(harness.store().requests().is_empty());
    assert!(!auth.is_authenticated());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn wrong_code_can_be_retried(ctx: &mut TestHarness) {
    let mut flow = ctx.flow();
    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();

    let err = flow
        .verify_code_and_create("111111", &mut ctx.auth)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::InvalidCode));

    flow.verify_code_and_create(DEMO_CODE, &mut ctx.auth)
        .await
        .unwrap();
    assert_eq!(flow.phase(), FlowPhase::Verified);
    assert_eq!(ctx.identity().verify_calls().len(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn blank_code_is_a_validation_error_without_network(ctx: &mut TestHarness) {
    let mut flow = ctx.flow();
    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();

    let err = flow
        .verify_code_and_create("   ", &mut ctx.auth)
        .await
        .unwrap_err();

    assert_eq!(missing(&err), vec![RequiredField::Code]);
    assert!(ctx.identity().verify_calls().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn second_verification_updates_existing_profile(ctx: &mut TestHarness) {
    let mut first = ctx.flow();
    first
        .request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();
    first
        .verify_code_and_create(DEMO_CODE, &mut ctx.auth)
        .await
        .unwrap();

    let mut second = ctx.flow();
    second
        .request_code(iphone_details().with_city("Омск"), BUYER_PHONE)
        .await
        .unwrap();
    let outcome = second
        .verify_code_and_create(DEMO_CODE, &mut ctx.auth)
        .await
        .unwrap();

    assert!(matches!(outcome.profile, ProfileWrite::CityUpdated(_)));
    assert_eq!(ctx.store().profiles().len(), 1);
    assert_eq!(ctx.store().calls(StoreOp::ProfileInsert), 1);
    let profile = ctx.store().profile(outcome.user.id).unwrap();
    assert_eq!(profile.city.as_deref(), Some("Омск"));
    assert_eq!(ctx.store().requests().len(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn existing_profile_without_form_city_is_left_alone(ctx: &mut TestHarness) {
    let user = ctx.sign_in_as(BUYER_PHONE).await;
    let before = ctx.store().profile(user.id).unwrap();

    let mut flow = ctx.flow();
    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();
    let outcome = flow
        .verify_code_and_create(DEMO_CODE, &mut ctx.auth)
        .await
        .unwrap();

    assert_eq!(outcome.profile, ProfileWrite::Unchanged(before));
    assert_eq!(ctx.store().calls(StoreOp::ProfileUpdate), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn profile_failure_does_not_block_the_request(ctx: &mut TestHarness) {
    ctx.store()
        .fail_on(
            StoreOp::ProfileInsert,
            "new row violates row-level security policy",
        );

    let mut flow = ctx.flow();
    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();
    let outcome = flow
        .verify_code_and_create(DEMO_CODE, &mut ctx.auth)
        .await
        .unwrap();

    assert!(outcome.profile.is_failed());
    assert_eq!(ctx.store().requests().len(), 1);
    assert_eq!(flow.phase(), FlowPhase::Verified);
}

#[tokio::test]
async fn missing_current_user_after_verification_is_auth_state_error() {
    let harness = TestHarness::with_identity(MockIdentityGateway::new().forgetting_session());
    let mut flow = harness.flow();
    let mut auth = AuthContext::anonymous();

    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();
    let err = flow
        .verify_code_and_create(DEMO_CODE, &mut auth)
        .await
        .unwrap_err();

    assert!(matches!(err, MarketError::AuthState));
    assert!(harness.store().requests().is_empty());
    assert_eq!(flow.phase(), FlowPhase::AwaitingCode);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn insert_failure_is_resource_creation_error(ctx: &mut TestHarness) {
    ctx.store().fail_on(StoreOp::RequestInsert, "403 Forbidden");

    let mut flow = ctx.flow();
    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();
    let err = flow
        .verify_code_and_create(DEMO_CODE, &mut ctx.auth)
        .await
        .unwrap_err();

    match &err {
        MarketError::ResourceCreation { resource, reason } => {
            assert_eq!(*resource, "запрос");
            assert_eq!(reason, "Доступ запрещен");
        }
        other => panic!("expected ResourceCreation, got {:?}", other),
    }
    assert_eq!(flow.phase(), FlowPhase::AwaitingCode);
    // The session obtained by the verification is kept
    assert!(ctx.auth.is_authenticated());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn verify_before_request_code_is_invalid_state(ctx: &mut TestHarness) {
    let mut flow = ctx.flow();
    let err = flow
        .verify_code_and_create(DEMO_CODE, &mut ctx.auth)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::InvalidState(_)));
    assert!(ctx.identity().verify_calls().is_empty());
}

// ============================================================================
// resend / change_number
// ============================================================================

#[tokio::test(start_paused = true)]
async fn resend_is_throttled_until_countdown_expires() {
    let harness = TestHarness::new();
    let mut flow = harness.flow();
    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();

    assert_eq!(
        flow.resend().await.unwrap(),
        ResendOutcome::Throttled { remaining_secs: 60 }
    );

    tokio::time::advance(Duration::from_secs(45)).await;
    assert_eq!(flow.countdown_remaining(), 15);
    assert_eq!(
        flow.resend().await.unwrap(),
        ResendOutcome::Throttled { remaining_secs: 15 }
    );
    assert_eq!(harness.identity().send_count(), 1);

    tokio::time::advance(Duration::from_secs(15)).await;
    assert_eq!(flow.countdown_remaining(), 0);
    assert_eq!(flow.resend().await.unwrap(), ResendOutcome::Sent);
    assert_eq!(harness.identity().send_count(), 2);
    assert_eq!(flow.countdown_remaining(), 60);

    // Immediately after the resend the countdown throttles again
    assert!(matches!(
        flow.resend().await.unwrap(),
        ResendOutcome::Throttled { .. }
    ));
    assert_eq!(harness.identity().send_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn resend_uses_configured_cooldown() {
    let harness = TestHarness::new();
    let deps = harness
        .deps
        .clone()
        .with_resend_cooldown(Duration::from_secs(5));
    let mut flow = VerificationFlow::new(deps);

    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();
    assert_eq!(flow.countdown_remaining(), 5);

    tokio::time::advance(Duration::from_secs(5)).await;
    assert_eq!(flow.resend().await.unwrap(), ResendOutcome::Sent);
    assert_eq!(
        harness.identity().sent_codes(),
        vec![BUYER_PHONE.to_string(), BUYER_PHONE.to_string()]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn change_number_returns_details_and_resets(ctx: &mut TestHarness) {
    let mut flow = ctx.flow();
    assert_eq!(flow.change_number(), None);

    flow.request_code(iphone_details(), BUYER_PHONE)
        .await
        .unwrap();
    let details = flow.change_number().unwrap();

    assert_eq!(details, iphone_details());
    assert_eq!(flow.phase(), FlowPhase::CollectingDetails);
    assert_eq!(flow.countdown_remaining(), 0);

    flow.request_code(details, "+79990000001").await.unwrap();
    assert_eq!(flow.pending_phone(), Some("+79990000001"));
}

// ============================================================================
// publish_signed_in
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn signed_in_users_publish_without_a_code(ctx: &mut TestHarness) {
    let user = ctx.sign_in_as(BUYER_PHONE).await;
    let sent_before = ctx.identity().send_count();

    let mut flow = ctx.flow();
    let request = flow
        .publish_signed_in(&iphone_details(), &ctx.auth)
        .await
        .unwrap();

    assert_eq!(request.user_id, user.id);
    assert_eq!(flow.phase(), FlowPhase::Verified);
    assert_eq!(ctx.identity().send_count(), sent_before);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn publish_signed_in_requires_a_session(ctx: &mut TestHarness) {
    let mut flow = ctx.flow();
    let err = flow
        .publish_signed_in(&iphone_details(), &ctx.auth)
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::AuthenticationRequired));
    assert!(ctx.store().requests().is_empty());
}

// ============================================================================
// Property: blank required fields
// ============================================================================

fn text_field() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ \t]{1,3}",
        "[a-zа-я]{1,10}",
    ]
}

fn category_field() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("  ".to_string()),
        Just("Авто".to_string()),
    ]
}

proptest! {
    #[test]
    fn any_blank_required_field_blocks_the_send(
        title in text_field(),
        description in text_field(),
        category in category_field(),
        phone in text_field(),
    ) {
        tokio_test::block_on(async {
            let harness = TestHarness::new();
            let mut flow = harness.flow();

            let mut expected = Vec::new();
            for (field, value) in [
                (RequiredField::Title, &title),
                (RequiredField::Description, &description),
                (RequiredField::Category, &category),
                (RequiredField::Phone, &phone),
            ] {
                if value.trim().is_empty() {
                    expected.push(field);
                }
            }

            let details = RequestDetails::new(title.clone(), description.clone(), category.clone());
            let result = flow.request_code(details, &phone).await;

            if expected.is_empty() {
                prop_assert!(result.is_ok());
                prop_assert_eq!(harness.identity().send_count(), 1);
            } else {
                let err = result.unwrap_err();
                prop_assert_eq!(missing(&err), expected);
                prop_assert_eq!(harness.identity().send_count(), 0);
                prop_assert_eq!(flow.phase(), FlowPhase::CollectingDetails);
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
