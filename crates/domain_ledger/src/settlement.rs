//! Settlement records
//!
//! A settlement is a real-world payment from one member to another that
//! has already happened and reduces what the payer owes the payee.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{GroupId, Money, SettlementId, UserId};
use crate::error::LedgerError;

/// How the settlement was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Venmo,
    Paypal,
    Zelle,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    /// Returns the stored name of the payment method
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Venmo => "venmo",
            PaymentMethod::Paypal => "paypal",
            PaymentMethod::Zelle => "zelle",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Other => "other",
        }
    }
}

/// A recorded payment between two group members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier
    pub id: SettlementId,
    /// Group the settlement belongs to
    pub group_id: GroupId,
    /// Member who paid
    pub from_user: UserId,
    /// Member who received the payment
    pub to_user: UserId,
    /// Amount paid
    pub amount: Money,
    /// Payment method
    pub payment_method: PaymentMethod,
    /// Optional external reference
    pub reference: Option<String>,
    /// When the payment happened
    pub date: DateTime<Utc>,
}

impl Settlement {
    /// Creates a cash settlement dated now
    pub fn new(group_id: GroupId, from_user: UserId, to_user: UserId, amount: Money) -> Self {
        Self {
            id: SettlementId::new_v7(),
            group_id,
            from_user,
            to_user,
            amount,
            payment_method: PaymentMethod::default(),
            reference: None,
            date: Utc::now(),
        }
    }

    /// Sets the payment method
    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    /// Sets the external reference
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Sets the settlement date
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Returns true if both members take part in this settlement
    pub fn between(&self, a: UserId, b: UserId) -> bool {
        (self.from_user == a && self.to_user == b) || (self.from_user == b && self.to_user == a)
    }

    /// Checks the write-time invariants of a settlement
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.from_user == self.to_user {
            return Err(LedgerError::SelfSettlement(self.from_user.to_string()));
        }
        if !self.amount.is_positive() {
            return Err(LedgerError::InvalidAmount(self.amount.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_between_is_symmetric() {
        let a = UserId::new();
        let b = UserId::new();
        let settlement = Settlement::new(GroupId::new(), a, b, Money::new(dec!(30)));

        assert!(settlement.between(a, b));
        assert!(settlement.between(b, a));
        assert!(!settlement.between(a, UserId::new()));
    }

    #[test]
    fn test_self_settlement_rejected() {
        let a = UserId::new();
        let settlement = Settlement::new(GroupId::new(), a, a, Money::new(dec!(30)));
        assert!(matches!(settlement.validate(), Err(LedgerError::SelfSettlement(_))));
    }

    #[test]
    fn test_payment_method_names() {
        assert_eq!(PaymentMethod::BankTransfer.as_str(), "bank_transfer");
        let json = serde_json::to_string(&PaymentMethod::BankTransfer).unwrap();
        assert_eq!(json, "\"bank_transfer\"");
    }
}
