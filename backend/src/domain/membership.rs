//! Per-user recipe membership sets: favorites and the shopping cart.
//!
//! Both sets share the same toggle semantics. Adding an existing pair and
//! removing a missing one fail with symmetric errors; this module only names
//! the sets and their client-facing messages.

use std::fmt;

/// Which membership set an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipKind {
    Favorite,
    ShoppingCart,
}

impl MembershipKind {
    /// Message for adding a recipe that is already a member.
    pub fn already_member_message(self) -> &'static str {
        match self {
            Self::Favorite => "recipe is already in favorites",
            Self::ShoppingCart => "recipe is already in the shopping cart",
        }
    }

    /// Detail code for adding a recipe that is already a member.
    pub fn already_member_code(self) -> &'static str {
        match self {
            Self::Favorite => "already_in_favorites",
            Self::ShoppingCart => "already_in_shopping_cart",
        }
    }

    /// Message for removing a recipe that is not a member.
    pub fn not_member_message(self) -> &'static str {
        match self {
            Self::Favorite => "recipe is not in favorites",
            Self::ShoppingCart => "recipe is not in the shopping cart",
        }
    }

    /// Detail code for removing a recipe that is not a member.
    pub fn not_member_code(self) -> &'static str {
        match self {
            Self::Favorite => "not_in_favorites",
            Self::ShoppingCart => "not_in_shopping_cart",
        }
    }
}

impl fmt::Display for MembershipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Favorite => f.write_str("favorites"),
            Self::ShoppingCart => f.write_str("shopping cart"),
        }
    }
}
