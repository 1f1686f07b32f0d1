//! In-memory cache of notification rules.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::client::rules::NotificationRule;

/// Concurrent map from a fully-qualified rule name to the last rule fetched
/// under that name.
///
/// Entries are only ever written by list fetches and are never evicted, so a
/// rule changed or deleted through another path stays stale until the next
/// list of its parent. Readers share the lock; a writer holds it for a single
/// insert. The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct RuleCache {
    rules: RwLock<HashMap<String, NotificationRule>>,
}

impl RuleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a rule by its full name.
    pub fn get(&self, name: &str) -> Option<NotificationRule> {
        self.rules.read().get(name).cloned()
    }

    /// Insert or overwrite a rule, keyed by its own `name`.
    pub fn set(&self, rule: NotificationRule) {
        self.rules.write().insert(rule.name.clone(), rule);
    }

    /// Number of cached rules.
    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    /// Whether the cache holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}
