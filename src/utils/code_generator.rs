//! Short code generation for auto-generated links.
//!
//! Codes are sampled from a non-cryptographic thread-local RNG. The goal is
//! collision resistance, not secrecy.

use std::sync::Arc;

use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::debug;

use crate::domain::repositories::LinkRepository;
use crate::error::StoreError;

/// Length of generated codes.
pub const CODE_LENGTH: usize = 6;

/// Produces short codes that are unused at the moment of generation.
///
/// The generator never reserves a code. Two callers may receive the same
/// candidate; the store's uniqueness constraint settles that race (see
/// [`crate::application::services::LinkService::create`]).
#[derive(Clone)]
pub struct CodeGenerator {
    link_repository: Arc<dyn LinkRepository>,
}

impl CodeGenerator {
    pub fn new(link_repository: Arc<dyn LinkRepository>) -> Self {
        Self { link_repository }
    }

    /// Samples codes until one is absent from the store.
    ///
    /// There is no attempt cap: with 62^6 possible codes a collision streak
    /// long enough to matter requires a nearly full keyspace.
    ///
    /// # Errors
    ///
    /// Propagates store failures from the existence check.
    pub async fn generate(&self) -> Result<String, StoreError> {
        loop {
            let candidate = generate_candidate();

            if !self
                .link_repository
                .exists_by_code(&candidate, None)
                .await?
            {
                return Ok(candidate);
            }

            debug!(code = %candidate, "Generated code already in use, resampling");
        }
    }
}

/// Samples one candidate code of [`CODE_LENGTH`] alphanumeric characters.
pub fn generate_candidate() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_candidate_has_correct_length() {
        assert_eq!(generate_candidate().len(), CODE_LENGTH);
    }

    #[test]
    fn test_candidate_alphanumeric_only() {
        for _ in 0..500 {
            let code = generate_candidate();
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()), "{code}");
        }
    }

    #[test]
    fn test_candidates_are_mostly_unique() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_candidate()).collect();
        assert!(codes.len() > 990);
    }

    #[test]
    fn test_candidates_use_both_cases_and_digits() {
        let joined: String = (0..200).map(|_| generate_candidate()).collect();
        assert!(joined.chars().any(|c| c.is_ascii_uppercase()));
        assert!(joined.chars().any(|c| c.is_ascii_lowercase()));
        assert!(joined.chars().any(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_generate_returns_unused_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code()
            .withf(|code, exclude| code.len() == CODE_LENGTH && exclude.is_none())
            .times(1)
            .returning(|_, _| Ok(false));

        let generator = CodeGenerator::new(Arc::new(repo));
        let code = generator.generate().await.unwrap();

        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[tokio::test]
    async fn test_generate_retries_on_collision() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code()
            .times(4)
            .returning(move |_, _| Ok(counter.fetch_add(1, Ordering::SeqCst) < 3));

        let generator = CodeGenerator::new(Arc::new(repo));
        let code = generator.generate().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(code.len(), CODE_LENGTH);
    }

    #[tokio::test]
    async fn test_generate_propagates_store_error() {
        let mut repo = MockLinkRepository::new();
        repo.expect_exists_by_code()
            .times(1)
            .returning(|_, _| Err(StoreError::Database("down".into())));

        let generator = CodeGenerator::new(Arc::new(repo));

        assert!(matches!(
            generator.generate().await,
            Err(StoreError::Database(_))
        ));
    }
}
