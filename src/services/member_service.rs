//! Member service - signup, login and token reissue.
//!
//! The refresh token store holds the only state that outlives a call: one
//! live refresh token per member. Login overwrites it, reissue rotates it.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Member, PasswordEncoder, RefreshToken};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;
use crate::security::{IdentityClaims, TokenPair, TokenProvider};

/// Password hashed once when the service is built and checked when the
/// login name is unknown, so that both failure paths do the same work.
const TIMING_DUMMY_PASSWORD: &str = "timing-equalization-dummy-password";

/// Member service trait for dependency injection.
#[async_trait]
pub trait MemberService: Send + Sync {
    /// Register a new member with the default authority. Issues no tokens.
    async fn signup(&self, name: String, password: String) -> AppResult<()>;

    /// Verify credentials and open a new session, replacing any previous one.
    async fn login(&self, name: String, password: String) -> AppResult<TokenPair>;

    /// Exchange the live refresh token for a new pair, rotating it.
    async fn reissue(&self, access_token: &str, refresh_token: &str) -> AppResult<TokenPair>;

    /// Fail with `DuplicateIdentity` if the name is taken.
    async fn check_name(&self, name: &str) -> AppResult<()>;

    /// Resolve the member behind an unexpired access token.
    fn authenticate(&self, access_token: &str) -> AppResult<IdentityClaims>;
}

/// Concrete implementation of MemberService using Unit of Work.
pub struct MemberManager<U: UnitOfWork> {
    uow: Arc<U>,
    tokens: Arc<TokenProvider>,
    encoder: Arc<dyn PasswordEncoder>,
    dummy_hash: String,
}

impl<U: UnitOfWork> MemberManager<U> {
    /// # Errors
    /// Fails if the encoder cannot hash the timing dummy password.
    pub fn new(
        uow: Arc<U>,
        tokens: Arc<TokenProvider>,
        encoder: Arc<dyn PasswordEncoder>,
    ) -> AppResult<Self> {
        let dummy_hash = encoder.encode(TIMING_DUMMY_PASSWORD)?;

        Ok(Self {
            uow,
            tokens,
            encoder,
            dummy_hash,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> MemberService for MemberManager<U> {
    async fn signup(&self, name: String, password: String) -> AppResult<()> {
        if self.uow.members().exists_by_name(&name).await? {
            return Err(AppError::duplicate(name));
        }

        let password_hash = self.encoder.encode(&password)?;
        let member = self
            .uow
            .members()
            .save(Member::new(name, password_hash))
            .await?;

        tracing::info!("Member {} signed up", member.name);
        Ok(())
    }

    async fn login(&self, name: String, password: String) -> AppResult<TokenPair> {
        let member = self.uow.members().find_by_name(&name).await?;

        let stored_hash = match &member {
            Some(member) => member.password.as_str(),
            None => self.dummy_hash.as_str(),
        };
        let password_valid = self.encoder.matches(&password, stored_hash);

        // Callers see one error either way; the reason is only logged
        let member = match member {
            Some(member) if password_valid => member,
            Some(_) => {
                tracing::warn!("Login rejected for {}: password mismatch", name);
                return Err(AppError::AuthenticationFailed);
            }
            None => {
                tracing::warn!("Login rejected for {}: unknown member", name);
                return Err(AppError::AuthenticationFailed);
            }
        };

        let pair = self
            .tokens
            .generate_token_pair(&member.name, member.authority)?;

        self.uow
            .refresh_tokens()
            .save(RefreshToken::new(member.name.as_str(), pair.refresh_token.as_str()))
            .await?;

        tracing::info!("Member {} logged in", member.name);
        Ok(pair)
    }

    async fn reissue(&self, access_token: &str, refresh_token: &str) -> AppResult<TokenPair> {
        if !self.tokens.validate_token(refresh_token) {
            return Err(AppError::InvalidToken);
        }

        // The access token may be expired; only its claims are needed
        let identity = self.tokens.extract_identity(access_token)?;

        let refresh_tokens = self.uow.refresh_tokens();
        let mut stored = refresh_tokens
            .find_by_key(&identity.name)
            .await?
            .ok_or(AppError::SessionNotFound)?;

        if !stored.matches(refresh_token) {
            tracing::warn!(
                "Reissue rejected for {}: refresh token is not the live one",
                identity.name
            );
            return Err(AppError::TokenMismatch);
        }

        let pair = self
            .tokens
            .generate_token_pair(&identity.name, identity.authority)?;

        refresh_tokens
            .update_value(&mut stored, pair.refresh_token.clone())
            .await?;

        tracing::debug!("Rotated refresh token for {}", identity.name);
        Ok(pair)
    }

    async fn check_name(&self, name: &str) -> AppResult<()> {
        if self.uow.members().exists_by_name(name).await? {
            return Err(AppError::duplicate(name));
        }
        Ok(())
    }

    fn authenticate(&self, access_token: &str) -> AppResult<IdentityClaims> {
        self.tokens.authenticate(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::Duration;

    use crate::domain::Authority;
    use crate::infra::{
        MemberRepository, MockMemberRepository, MockRefreshTokenRepository,
        RefreshTokenRepository,
    };

    const SECRET: &[u8] = b"test-secret-key-for-testing-only-32chars";

    /// Stores passwords verbatim so tests skip Argon2
    struct PlainTextEncoder;

    impl PasswordEncoder for PlainTextEncoder {
        fn encode(&self, plain_text: &str) -> AppResult<String> {
            Ok(format!("plain:{}", plain_text))
        }

        fn matches(&self, plain_text: &str, hash: &str) -> bool {
            hash.strip_prefix("plain:") == Some(plain_text)
        }
    }

    struct TestUnitOfWork {
        members: Arc<MockMemberRepository>,
        refresh_tokens: Arc<MockRefreshTokenRepository>,
    }

    impl UnitOfWork for TestUnitOfWork {
        fn members(&self) -> Arc<dyn MemberRepository> {
            self.members.clone()
        }

        fn refresh_tokens(&self) -> Arc<dyn RefreshTokenRepository> {
            self.refresh_tokens.clone()
        }
    }

    fn tokens() -> Arc<TokenProvider> {
        Arc::new(TokenProvider::new(
            SECRET,
            Duration::minutes(30),
            Duration::days(7),
        ))
    }

    fn service(
        members: MockMemberRepository,
        refresh_tokens: MockRefreshTokenRepository,
    ) -> MemberManager<TestUnitOfWork> {
        let uow = TestUnitOfWork {
            members: Arc::new(members),
            refresh_tokens: Arc::new(refresh_tokens),
        };
        MemberManager::new(Arc::new(uow), tokens(), Arc::new(PlainTextEncoder)).unwrap()
    }

    fn alice() -> Member {
        Member::new("alice".to_string(), "plain:pw".to_string())
    }

    #[tokio::test]
    async fn test_signup_hashes_and_saves() {
        let mut members = MockMemberRepository::new();
        members
            .expect_exists_by_name()
            .withf(|name: &str| name == "alice")
            .returning(|_| Ok(false));
        members
            .expect_save()
            .withf(|member: &Member| {
                member.name == "alice"
                    && member.password == "plain:pw"
                    && member.authority == Authority::RoleUser
            })
            .times(1)
            .returning(Ok);

        let service = service(members, MockRefreshTokenRepository::new());
        service
            .signup("alice".to_string(), "pw".to_string())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_signup_duplicate_saves_nothing() {
        let mut members = MockMemberRepository::new();
        members.expect_exists_by_name().returning(|_| Ok(true));
        members.expect_save().never();

        let service = service(members, MockRefreshTokenRepository::new());
        let result = service.signup("alice".to_string(), "pw".to_string()).await;

        assert!(matches!(result, Err(AppError::DuplicateIdentity(name)) if name == "alice"));
    }

    #[tokio::test]
    async fn test_login_saves_issued_refresh_token() {
        let mut members = MockMemberRepository::new();
        members
            .expect_find_by_name()
            .returning(|_| Ok(Some(alice())));

        let mut refresh_tokens = MockRefreshTokenRepository::new();
        refresh_tokens
            .expect_save()
            .withf(|token: &RefreshToken| token.key() == "alice")
            .times(1)
            .returning(Ok);

        let service = service(members, refresh_tokens);
        let pair = service
            .login("alice".to_string(), "pw".to_string())
            .await
            .unwrap();

        assert!(service.tokens.validate_token(&pair.refresh_token));
        assert_eq!(service.authenticate(&pair.access_token).unwrap().name, "alice");
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let mut members = MockMemberRepository::new();
        members
            .expect_find_by_name()
            .returning(|name| Ok((name == "alice").then(alice)));

        let mut refresh_tokens = MockRefreshTokenRepository::new();
        refresh_tokens.expect_save().never();

        let service = service(members, refresh_tokens);
        let wrong_password = service
            .login("alice".to_string(), "nope".to_string())
            .await
            .unwrap_err();
        let unknown_member = service
            .login("bob".to_string(), "pw".to_string())
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::AuthenticationFailed));
        assert!(matches!(unknown_member, AppError::AuthenticationFailed));
        assert_eq!(wrong_password.to_string(), unknown_member.to_string());
    }

    #[tokio::test]
    async fn test_reissue_rejects_invalid_refresh_before_lookup() {
        let mut refresh_tokens = MockRefreshTokenRepository::new();
        refresh_tokens.expect_find_by_key().never();
        refresh_tokens.expect_update_value().never();

        let service = service(MockMemberRepository::new(), refresh_tokens);
        let pair = service.tokens.generate_token_pair("alice", Authority::RoleUser).unwrap();

        let result = service.reissue(&pair.access_token, "forged.refresh.token").await;
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_reissue_rejects_expired_refresh() {
        let mut refresh_tokens = MockRefreshTokenRepository::new();
        refresh_tokens.expect_find_by_key().never();

        let service = service(MockMemberRepository::new(), refresh_tokens);
        let stale = TokenProvider::new(SECRET, Duration::minutes(-5), Duration::minutes(-5))
            .generate_token_pair("alice", Authority::RoleUser)
            .unwrap();

        let result = service.reissue(&stale.access_token, &stale.refresh_token).await;
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_reissue_without_session() {
        let mut refresh_tokens = MockRefreshTokenRepository::new();
        refresh_tokens
            .expect_find_by_key()
            .withf(|key: &str| key == "alice")
            .returning(|_| Ok(None));
        refresh_tokens.expect_update_value().never();

        let service = service(MockMemberRepository::new(), refresh_tokens);
        let pair = service.tokens.generate_token_pair("alice", Authority::RoleUser).unwrap();

        let result = service.reissue(&pair.access_token, &pair.refresh_token).await;
        assert!(matches!(result, Err(AppError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_reissue_with_superseded_refresh() {
        let mut refresh_tokens = MockRefreshTokenRepository::new();
        refresh_tokens
            .expect_find_by_key()
            .returning(|key| Ok(Some(RefreshToken::new(key, "the-live-one"))));
        refresh_tokens.expect_update_value().never();

        let service = service(MockMemberRepository::new(), refresh_tokens);
        let pair = service.tokens.generate_token_pair("alice", Authority::RoleUser).unwrap();

        let result = service.reissue(&pair.access_token, &pair.refresh_token).await;
        assert!(matches!(result, Err(AppError::TokenMismatch)));
    }

    #[tokio::test]
    async fn test_reissue_rejects_malformed_access_token() {
        let mut refresh_tokens = MockRefreshTokenRepository::new();
        refresh_tokens.expect_find_by_key().never();

        let service = service(MockMemberRepository::new(), refresh_tokens);
        let pair = service.tokens.generate_token_pair("alice", Authority::RoleUser).unwrap();

        let result = service.reissue("garbage", &pair.refresh_token).await;
        assert!(matches!(result, Err(AppError::MalformedToken)));
    }

    #[tokio::test]
    async fn test_reissue_rotates_to_new_refresh_token() {
        let tokens = tokens();
        let issued = tokens.generate_token_pair("alice", Authority::RoleUser).unwrap();
        let live = issued.refresh_token.clone();

        let mut refresh_tokens = MockRefreshTokenRepository::new();
        refresh_tokens
            .expect_find_by_key()
            .returning(move |key| Ok(Some(RefreshToken::new(key, live.clone()))));
        refresh_tokens
            .expect_update_value()
            .times(1)
            .returning(|token: &mut RefreshToken, value: String| {
                token.update_value(value);
                Ok(())
            });

        let service = service(MockMemberRepository::new(), refresh_tokens);
        let pair = service
            .reissue(&issued.access_token, &issued.refresh_token)
            .await
            .unwrap();

        assert_ne!(pair.refresh_token, issued.refresh_token);
        assert!(service.tokens.validate_token(&pair.refresh_token));
    }

    #[tokio::test]
    async fn test_reissue_surfaces_lost_rotation_race() {
        let tokens = tokens();
        let issued = tokens.generate_token_pair("alice", Authority::RoleUser).unwrap();
        let live = issued.refresh_token.clone();

        let mut refresh_tokens = MockRefreshTokenRepository::new();
        refresh_tokens
            .expect_find_by_key()
            .returning(move |key| Ok(Some(RefreshToken::new(key, live.clone()))));
        refresh_tokens
            .expect_update_value()
            .returning(|_, _| Err(AppError::TokenMismatch));

        let service = service(MockMemberRepository::new(), refresh_tokens);
        let result = service
            .reissue(&issued.access_token, &issued.refresh_token)
            .await;

        assert!(matches!(result, Err(AppError::TokenMismatch)));
    }

    #[tokio::test]
    async fn test_check_name() {
        let mut members = MockMemberRepository::new();
        members
            .expect_exists_by_name()
            .returning(|name| Ok(name == "alice"));

        let service = service(members, MockRefreshTokenRepository::new());

        assert!(matches!(
            service.check_name("alice").await,
            Err(AppError::DuplicateIdentity(_))
        ));
        assert!(service.check_name("bob").await.is_ok());
    }

    /// Counts hashing calls made through it
    #[derive(Default)]
    struct CountingEncoder {
        encodes: AtomicUsize,
    }

    impl PasswordEncoder for CountingEncoder {
        fn encode(&self, plain_text: &str) -> AppResult<String> {
            self.encodes.fetch_add(1, Ordering::SeqCst);
            PlainTextEncoder.encode(plain_text)
        }

        fn matches(&self, plain_text: &str, hash: &str) -> bool {
            PlainTextEncoder.matches(plain_text, hash)
        }
    }

    #[tokio::test]
    async fn test_unknown_member_login_does_not_hash() {
        let mut members = MockMemberRepository::new();
        members.expect_find_by_name().returning(|_| Ok(None));

        let encoder = Arc::new(CountingEncoder::default());
        let uow = TestUnitOfWork {
            members: Arc::new(members),
            refresh_tokens: Arc::new(MockRefreshTokenRepository::new()),
        };
        let service = MemberManager::new(Arc::new(uow), tokens(), encoder.clone()).unwrap();
        assert_eq!(encoder.encodes.load(Ordering::SeqCst), 1);

        for _ in 0..2 {
            let result = service.login("ghost".to_string(), "pw".to_string()).await;
            assert!(matches!(result, Err(AppError::AuthenticationFailed)));
        }
        assert_eq!(encoder.encodes.load(Ordering::SeqCst), 1);
    }
}
