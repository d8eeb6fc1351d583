//! ドメイン型（Newtype と閉じた列挙）
//!
//! String を直接運ばず、意味のある型に包んで境界を明確にする。
//! ツアーの進行規則は `state`、step 定義は `step`、完了レコードは
//! `completion`、計測イベントは `event`、カード検証は `payment` にある。

pub mod completion;
pub mod event;
pub mod payment;
pub mod state;
pub mod step;

use crate::error::Error;
use serde::{Deserialize, Serialize};

/// ツアー識別子（例: "welcome-producer-dashboard"）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TourId(pub String);

impl TourId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl std::ops::Deref for TourId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for TourId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for TourId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TourId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// 利用者ロール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Producer,
    Buyer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Producer => "producer",
            Role::Buyer => "buyer",
            Role::Admin => "admin",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "producer" => Ok(Role::Producer),
            "buyer" => Ok(Role::Buyer),
            "admin" => Ok(Role::Admin),
            other => Err(Error::invalid_argument(format!("unknown role: {}", other))),
        }
    }
}

/// ツアーが走る画面コンテキスト
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TourContext {
    Dashboard,
    Marketplace,
    ProductCreate,
    ProductEdit,
    Profile,
    Orders,
    Cart,
}

impl TourContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            TourContext::Dashboard => "dashboard",
            TourContext::Marketplace => "marketplace",
            TourContext::ProductCreate => "product-create",
            TourContext::ProductEdit => "product-edit",
            TourContext::Profile => "profile",
            TourContext::Orders => "orders",
            TourContext::Cart => "cart",
        }
    }
}

impl std::str::FromStr for TourContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(TourContext::Dashboard),
            "marketplace" => Ok(TourContext::Marketplace),
            "product-create" => Ok(TourContext::ProductCreate),
            "product-edit" => Ok(TourContext::ProductEdit),
            "profile" => Ok(TourContext::Profile),
            "orders" => Ok(TourContext::Orders),
            "cart" => Ok(TourContext::Cart),
            other => Err(Error::invalid_argument(format!("unknown context: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn tour_id_newtype_construct() {
        let id = TourId::new("welcome-buyer-cart");
        assert_eq!(id.0, "welcome-buyer-cart");
        assert_eq!(format!("{}", id), "welcome-buyer-cart");
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Producer, Role::Buyer, Role::Admin] {
            assert_eq!(Role::from_str(role.as_str()).unwrap(), role);
        }
        assert!(Role::from_str("guest").is_err());
    }

    #[test]
    fn test_context_round_trip() {
        for ctx in [
            TourContext::Dashboard,
            TourContext::Marketplace,
            TourContext::ProductCreate,
            TourContext::ProductEdit,
            TourContext::Profile,
            TourContext::Orders,
            TourContext::Cart,
        ] {
            assert_eq!(TourContext::from_str(ctx.as_str()).unwrap(), ctx);
        }
        assert!(TourContext::from_str("checkout").is_err());
    }
}
