//! Test harness wiring in-memory collaborators into `MarketDeps`.
//!
//! Each test gets a fresh gateway, a fresh store and an anonymous
//! `AuthContext`.

use marketplace_core::domains::auth::actions::verify_login_code;
use marketplace_core::domains::auth::models::{AuthContext, User};
use marketplace_core::domains::verification::VerificationFlow;
use marketplace_core::kernel::{
    MarketDeps, MemoryStore, MockIdentityGateway, TestDependencies, DEMO_CODE,
};
use test_context::AsyncTestContext;

/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &mut TestHarness) {
///     let mut flow = ctx.flow();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub mocks: TestDependencies,
    pub deps: MarketDeps,
    pub auth: AuthContext,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {
        // In-memory state is dropped with the harness
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_identity(MockIdentityGateway::new())
    }

    pub fn with_identity(identity: MockIdentityGateway) -> Self {
        // Run tests with: RUST_LOG=debug cargo test -- --nocapture
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let mocks = TestDependencies::new().with_identity(identity);
        let deps = mocks.deps();
        Self {
            mocks,
            deps,
            auth: AuthContext::anonymous(),
        }
    }

    pub fn identity(&self) -> &MockIdentityGateway {
        &self.mocks.identity
    }

    pub fn store(&self) -> &MemoryStore {
        &self.mocks.store
    }

    pub fn flow(&self) -> VerificationFlow {
        VerificationFlow::new(self.deps.clone())
    }

    /// Sign the harness context in as the owner of `phone`.
    pub async fn sign_in_as(&mut self, phone: &str) -> User {
        verify_login_code(phone, DEMO_CODE, &mut self.auth, &self.deps)
            .await
            .expect("login with the demo code should succeed")
            .user
    }

    /// A separate signed-in context, for a second party in the same test.
    pub async fn other_user(&self, phone: &str) -> AuthContext {
        let mut auth = AuthContext::anonymous();
        verify_login_code(phone, DEMO_CODE, &mut auth, &self.deps)
            .await
            .expect("login with the demo code should succeed");
        auth
    }
}
