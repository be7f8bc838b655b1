//! Repositories
//!
//! The collaborator seams around the engine. Evaluation itself never touches
//! these: the checkout flow looks a code up before calling
//! [`evaluate`](crate::evaluation::evaluate), and bumps the usage counter
//! only after an order is durably created.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::codes::{CodeKey, DiscountCode, normalize_code};

/// Read-only lookup of active discount codes.
pub trait DiscountCodeRepository {
    /// Find an active code by its claimed name, case-insensitively.
    fn find_active_by_code(&self, code: &str) -> Option<&DiscountCode>;
}

/// Outcome of a conditional usage-counter bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageUpdate {
    /// The counter was below the cap and has been incremented.
    Incremented,

    /// The counter already met the cap; nothing was changed.
    CapReached,

    /// No record exists for the given key.
    NotFound,
}

/// Conditional "increment if below cap" usage-counter update.
///
/// Implementations must perform the check and the increment as one atomic
/// update against the underlying store; two checkouts racing the same code
/// must not both pass the cap check.
pub trait UsageCounterStore {
    /// Increment a code's usage counter unless its cap has been reached.
    fn increment_if_under_cap(&mut self, key: CodeKey) -> UsageUpdate;
}

/// In-memory code store backing the fixtures, demo binary, and tests.
#[derive(Debug, Default)]
pub struct InMemoryCodes {
    codes: SlotMap<CodeKey, DiscountCode>,
    by_code: FxHashMap<String, CodeKey>,
}

impl InMemoryCodes {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, indexing it by its upper-cased code.
    ///
    /// A record with the same normalized code replaces the previous index
    /// entry, matching a unique-code constraint in a real store.
    pub fn insert(&mut self, code: DiscountCode) -> CodeKey {
        let normalized = code.normalized_code();
        let key = self.codes.insert(code);
        self.by_code.insert(normalized, key);
        key
    }

    /// Fetch a record by key.
    pub fn get(&self, key: CodeKey) -> Option<&DiscountCode> {
        self.codes.get(key)
    }

    /// Look up a record's key by its claimed code, case-insensitively.
    pub fn key_of(&self, code: &str) -> Option<CodeKey> {
        self.by_code.get(&normalize_code(code)).copied()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl DiscountCodeRepository for InMemoryCodes {
    fn find_active_by_code(&self, code: &str) -> Option<&DiscountCode> {
        let key = self.by_code.get(&normalize_code(code))?;

        self.codes.get(*key).filter(|record| record.is_active)
    }
}

impl UsageCounterStore for InMemoryCodes {
    fn increment_if_under_cap(&mut self, key: CodeKey) -> UsageUpdate {
        let Some(record) = self.codes.get_mut(key) else {
            return UsageUpdate::NotFound;
        };

        match record.max_uses {
            Some(max_uses) if record.current_uses >= max_uses => UsageUpdate::CapReached,
            _ => {
                record.current_uses += 1;
                UsageUpdate::Incremented
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn store_with_save10() -> (InMemoryCodes, CodeKey) {
        let mut store = InMemoryCodes::new();
        let key = store.insert(DiscountCode::percentage("SAVE10", Decimal::from(10)));
        (store, key)
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let (store, _) = store_with_save10();

        assert!(store.find_active_by_code("save10").is_some());
        assert!(store.find_active_by_code(" Save10 ").is_some());
        assert!(store.find_active_by_code("SAVE20").is_none());
        assert!(store.key_of("sAvE10").is_some());
    }

    #[test]
    fn inactive_codes_are_not_found() {
        let mut store = InMemoryCodes::new();
        store.insert(DiscountCode::percentage("SAVE10", Decimal::from(10)).deactivated());

        assert!(store.find_active_by_code("SAVE10").is_none());
    }

    #[test]
    fn increment_stops_at_the_cap() {
        let mut store = InMemoryCodes::new();
        let key = store.insert(
            DiscountCode::percentage("SAVE10", Decimal::from(10))
                .with_max_uses(2)
                .with_current_uses(1),
        );

        assert_eq!(store.increment_if_under_cap(key), UsageUpdate::Incremented);
        assert_eq!(store.increment_if_under_cap(key), UsageUpdate::CapReached);
        assert_eq!(store.get(key).map(|code| code.current_uses), Some(2));
    }

    #[test]
    fn uncapped_codes_always_increment() {
        let (mut store, key) = store_with_save10();

        assert_eq!(store.increment_if_under_cap(key), UsageUpdate::Incremented);
        assert_eq!(store.increment_if_under_cap(key), UsageUpdate::Incremented);
        assert_eq!(store.get(key).map(|code| code.current_uses), Some(2));
    }

    #[test]
    fn unknown_key_reports_not_found() {
        let (mut store, _) = store_with_save10();

        assert_eq!(
            store.increment_if_under_cap(CodeKey::default()),
            UsageUpdate::NotFound
        );
    }
}
