//! Built-in units for common checks

pub mod custom;
pub mod denylist;
pub mod length;
pub mod not_null;
pub mod pattern;
pub mod prioritized;

pub use custom::{CustomUnit, EvaluateFn};
pub use denylist::{Denylist, DenylistHandle};
pub use length::Length;
pub use not_null::NotNull;
pub use pattern::Pattern;
pub use prioritized::{Prioritized, UnitExt};
