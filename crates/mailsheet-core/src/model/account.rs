//! Recipient accounts listed on the handout.
//!
//! Accounts are never persisted; they live only as long as the session.

use crate::document::text::PLACEHOLDER;

/// Login credentials for one mailbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    /// Email address or user name.
    pub email: String,
    /// Password, printed as entered.
    pub password: String,
}

impl Account {
    /// Creates an account.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Email as printed, with the placeholder for an empty value.
    #[must_use]
    pub fn display_email(&self) -> &str {
        or_placeholder(&self.email)
    }

    /// Password as printed, with the placeholder for an empty value.
    #[must_use]
    pub fn display_password(&self) -> &str {
        or_placeholder(&self.password)
    }
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() { PLACEHOLDER } else { value }
}

/// Editable field of an [`Account`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    /// The email / user name field.
    Email,
    /// The password field.
    Password,
}

/// Ordered list of accounts that always holds at least one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountList {
    accounts: Vec<Account>,
}

impl Default for AccountList {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountList {
    /// Creates a list with a single blank account.
    #[must_use]
    pub fn new() -> Self {
        Self {
            accounts: vec![Account::default()],
        }
    }

    /// Appends a blank account.
    pub fn push(&mut self) {
        self.accounts.push(Account::default());
    }

    /// Removes the account at `index`.
    ///
    /// Does nothing and returns `false` when only one account remains or the
    /// index is out of range.
    pub fn remove(&mut self, index: usize) -> bool {
        if self.accounts.len() <= 1 || index >= self.accounts.len() {
            return false;
        }
        self.accounts.remove(index);
        true
    }

    /// Sets one field of the account at `index`. Out-of-range indices are ignored.
    pub fn update(&mut self, index: usize, field: AccountField, value: String) {
        if let Some(account) = self.accounts.get_mut(index) {
            match field {
                AccountField::Email => account.email = value,
                AccountField::Password => account.password = value,
            }
        }
    }

    /// Iterates accounts in order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    /// Returns the accounts as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Account] {
        &self.accounts
    }

    /// Number of accounts; never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Always `false`; kept for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_last_account_is_noop() {
        let mut list = AccountList::new();
        assert!(!list.remove(0));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn remove_keeps_order() {
        let mut list = AccountList::new();
        list.push();
        list.push();
        list.update(0, AccountField::Email, "a@example.jp".to_string());
        list.update(1, AccountField::Email, "b@example.jp".to_string());
        list.update(2, AccountField::Email, "c@example.jp".to_string());

        assert!(list.remove(1));
        let emails: Vec<_> = list.iter().map(|a| a.email.as_str()).collect();
        assert_eq!(emails, ["a@example.jp", "c@example.jp"]);
    }

    #[test]
    fn out_of_range_operations_are_ignored() {
        let mut list = AccountList::new();
        list.push();
        assert!(!list.remove(5));
        list.update(9, AccountField::Password, "x".to_string());
        assert_eq!(list.len(), 2);
        assert!(list.iter().all(|a| a.password.is_empty()));
    }

    #[test]
    fn list_never_drops_below_one() {
        let mut list = AccountList::new();
        for _ in 0..3 {
            list.push();
        }
        for _ in 0..10 {
            list.remove(0);
        }
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn empty_fields_display_placeholder() {
        let account = Account::new("info@example.jp", "");
        assert_eq!(account.display_email(), "info@example.jp");
        assert_eq!(account.display_password(), "-");
    }
}
