// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Token account owner resolution

use std::sync::Arc;

use ledger_client::LedgerClient;
use shared_types::{Address, EnrichedHolder, RawHolder};
use tracing::trace;

use crate::error::{CensusError, CensusResult};

/// Looks up the wallet that owns a token account
#[derive(Debug)]
pub struct OwnerResolver<C> {
    client: Arc<C>,
}

impl<C> Clone for OwnerResolver<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: LedgerClient> OwnerResolver<C> {
    /// Create a resolver backed by `client`
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Resolve the owner of `token_account`
    ///
    /// # Errors
    ///
    /// * [`CensusError::AccountNotFound`] if the ledger has no state for the account
    /// * [`CensusError::InvalidAccountData`] if the owner field is missing or malformed
    /// * [`CensusError::Lookup`] if the lookup itself fails
    pub async fn resolve(&self, token_account: &Address) -> CensusResult<Address> {
        let account = self
            .client
            .get_parsed_account(token_account)
            .await?
            .ok_or(CensusError::AccountNotFound {
                account: *token_account,
            })?;

        let owner = account.owner().ok_or_else(|| {
            CensusError::invalid_account_data(
                *token_account,
                format!("{} account has no owner", account.program),
            )
        })?;

        let owner: Address = owner.parse().map_err(|e| {
            CensusError::invalid_account_data(*token_account, format!("owner {owner:?}: {e}"))
        })?;

        trace!(account = %token_account, owner = %owner, "Resolved token account owner");
        Ok(owner)
    }

    /// Pair a holder with the wallet that owns its token account
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`OwnerResolver::resolve`]
    pub async fn enrich(&self, holder: RawHolder) -> CensusResult<EnrichedHolder> {
        let owner = self.resolve(&holder.token_account).await?;
        Ok(holder.with_owner(owner))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::{FakeLedger, parsed_token_account};

    #[tokio::test]
    async fn resolves_owner() {
        let account = Address::new([1; 32]);
        let wallet = Address::new([2; 32]);
        let resolver = OwnerResolver::new(Arc::new(FakeLedger::default().with_owner(account, wallet)));

        assert_eq!(resolver.resolve(&account).await.unwrap(), wallet);
    }

    #[tokio::test]
    async fn enrich_keeps_balance() {
        let account = Address::new([1; 32]);
        let wallet = Address::new([2; 32]);
        let resolver = OwnerResolver::new(Arc::new(FakeLedger::default().with_owner(account, wallet)));

        let enriched = resolver
            .enrich(RawHolder::new(account, 42))
            .await
            .unwrap();

        assert_eq!(
            enriched,
            EnrichedHolder {
                token_account: account,
                wallet_address: wallet,
                balance: 42,
            }
        );
    }

    #[tokio::test]
    async fn missing_account() {
        let account = Address::new([1; 32]);
        let resolver = OwnerResolver::new(Arc::new(FakeLedger::default().with_missing(account)));

        let error = resolver.resolve(&account).await.unwrap_err();
        assert!(matches!(error, CensusError::AccountNotFound { account: a } if a == account));
    }

    #[tokio::test]
    async fn missing_owner_field() {
        let account = Address::new([1; 32]);
        let mut parsed = parsed_token_account(json!(null));
        parsed.info.remove("owner");
        let resolver = OwnerResolver::new(Arc::new(FakeLedger::default().with_parsed(account, parsed)));

        let error = resolver.resolve(&account).await.unwrap_err();
        assert!(matches!(error, CensusError::InvalidAccountData { .. }));
        assert!(error.to_string().contains("no owner"));
    }

    #[tokio::test]
    async fn malformed_owner() {
        let account = Address::new([1; 32]);
        let resolver = OwnerResolver::new(Arc::new(
            FakeLedger::default().with_parsed(account, parsed_token_account(json!("not-an-address"))),
        ));

        let error = resolver.resolve(&account).await.unwrap_err();
        assert!(matches!(error, CensusError::InvalidAccountData { .. }));
    }

    #[tokio::test]
    async fn lookup_failure() {
        let resolver = OwnerResolver::new(Arc::new(FakeLedger::default()));

        let error = resolver.resolve(&Address::new([5; 32])).await.unwrap_err();
        assert!(matches!(error, CensusError::Lookup(_)));
        assert!(!error.is_fatal());
    }
}
