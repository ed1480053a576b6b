//! Session collaborator trait.

use std::sync::Arc;

use crate::types::AccountId;

/// Source of the currently active account.
///
/// Login and identity management live outside this crate; the engine only
/// asks who is logged in. `None` means unauthenticated, in which case no
/// pagination or metadata resolution is attempted.
pub trait SessionProvider: Send + Sync {
    fn current_account(&self) -> Option<AccountId>;
}

impl<T: SessionProvider + ?Sized> SessionProvider for Arc<T> {
    fn current_account(&self) -> Option<AccountId> {
        (**self).current_account()
    }
}
