//! Access policies applied by the authorization gate.
//!
//! # Design
//! - Membership is exact, case-sensitive string comparison.
//! - The allow-list is plain data; callers decide when to re-check it.

use crate::model::Session;

/// Addresses always present on the admin allow-list.
pub const DEFAULT_ADMIN_EMAILS: [&str; 2] = ["admin@example.com", "test@example.com"];
/// Default value of the overridable admin slot.
pub const DEFAULT_ADMIN_SLOT: &str = "admin@test.com";

/// Ordered set of emails allowed into the admin console.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllowList {
    emails: Vec<String>,
}

impl AllowList {
    /// Build an allow-list from explicit entries. Duplicates are dropped.
    #[must_use]
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self { emails: Vec::new() };
        for email in emails {
            let email = email.into();
            if !list.emails.contains(&email) {
                list.emails.push(email);
            }
        }
        list
    }

    /// Default admin allow-list with the overridable slot filled in.
    ///
    /// A blank override keeps [`DEFAULT_ADMIN_SLOT`].
    #[must_use]
    pub fn admin_defaults(slot_override: Option<&str>) -> Self {
        let slot = slot_override
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_ADMIN_SLOT);
        Self::new(DEFAULT_ADMIN_EMAILS.iter().copied().chain([slot]))
    }

    /// Whether `email` is on the list.
    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        self.emails.iter().any(|entry| entry == email)
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn emails(&self) -> &[String] {
        &self.emails
    }
}

/// Rule deciding which sessions may pass the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Only sessions whose email is on the allow-list.
    AllowList(AllowList),
    /// Any signed-in user.
    AnySession,
}

impl AccessPolicy {
    /// Whether `email` satisfies the policy.
    #[must_use]
    pub fn permits_email(&self, email: &str) -> bool {
        match self {
            Self::AllowList(list) => list.contains(email),
            Self::AnySession => !email.is_empty(),
        }
    }

    /// Whether `session` satisfies the policy.
    #[must_use]
    pub fn permits(&self, session: &Session) -> bool {
        self.permits_email(session.email())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_defaults_fill_slot() {
        let list = AllowList::admin_defaults(None);
        assert_eq!(
            list.emails(),
            ["admin@example.com", "test@example.com", "admin@test.com"]
        );
    }

    #[test]
    fn override_replaces_only_the_slot() {
        let list = AllowList::admin_defaults(Some(" ops@corp.example "));
        assert!(list.contains("ops@corp.example"));
        assert!(list.contains("admin@example.com"));
        assert!(!list.contains("admin@test.com"));
    }

    #[test]
    fn blank_override_keeps_default_slot() {
        assert!(AllowList::admin_defaults(Some("  ")).contains("admin@test.com"));
    }

    #[test]
    fn membership_is_case_sensitive() {
        let list = AllowList::admin_defaults(None);
        assert!(!list.contains("Admin@Test.com"));
        assert!(!list.contains(" admin@test.com"));
    }

    #[test]
    fn duplicate_entries_collapse() {
        let list = AllowList::new(["a@x.io", "a@x.io", "b@x.io"]);
        assert_eq!(list.emails().len(), 2);
    }

    #[test]
    fn any_session_rejects_blank_email() {
        assert!(AccessPolicy::AnySession.permits_email("someone@example.com"));
        assert!(!AccessPolicy::AnySession.permits_email(""));
    }
}
