//! A session whose account is set explicitly.

use std::sync::RwLock;

use tracing::info;

use ledgerpage_core::{AccountId, SessionProvider};

/// Session holding an account that callers log in and out by hand.
#[derive(Debug, Default)]
pub struct StaticSession {
    account: RwLock<Option<AccountId>>,
}

impl StaticSession {
    pub fn new(account: Option<AccountId>) -> Self {
        Self {
            account: RwLock::new(account),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn login(&self, account: AccountId) {
        info!(%account, "logged in");
        *self.account.write().unwrap_or_else(|e| e.into_inner()) = Some(account);
    }

    pub fn logout(&self) {
        info!("logged out");
        *self.account.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl SessionProvider for StaticSession {
    fn current_account(&self) -> Option<AccountId> {
        self.account
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
