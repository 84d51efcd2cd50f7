//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new value and replace the old one (e.g. a user's subscription is
/// replaced by `Subscription::Canceled`, never mutated in place).
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq)]
/// struct DailyQuota(u32);
///
/// impl ValueObject for DailyQuota {}
///
/// assert_eq!(DailyQuota(3), DailyQuota(3));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
