//! Ledger data model - contract metadata and payment installments.
//!
//! Both types are persisted as JSON arrays (one per property), so field names
//! are camelCase and enum values are the upper-case Spanish labels used by the
//! rest of the rental application.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::errors::Error;

/// Lifecycle state of a contract as seen by the payment ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractState {
    /// Created, not yet signed
    Activo,
    /// Signed by the tenant
    Vigente,
    /// Finalized
    Cancelado,
}

impl ContractState {
    /// Upper-case label as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Activo => "ACTIVO",
            Self::Vigente => "VIGENTE",
            Self::Cancelado => "CANCELADO",
        }
    }
}

impl fmt::Display for ContractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract metadata the ledger needs to derive a payment schedule.
///
/// Written by whoever creates or signs the contract; the ledger never
/// validates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractMeta {
    /// Contract identifier, unique within a property
    pub contract_id: i64,
    /// Property the contract belongs to
    pub property_id: i64,
    /// Tenant identifier
    pub tenant_id: i64,
    /// Tenant display name, copied into each generated installment
    pub tenant_name: String,
    /// Room identifier
    pub room_id: i64,
    /// Room display code, copied into each generated installment
    pub room_code: String,
    /// First due date of the schedule
    pub start_date: NaiveDate,
    /// Contract end date as recorded at creation; informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Number of monthly installments
    pub months: i32,
    /// Rent charged per installment
    pub monthly_rent: f64,
    /// Whether the tenant signature has been captured
    pub signed: bool,
    /// Lifecycle state
    pub estado: ContractState,
}

/// Whether an installment has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Awaiting payment
    Pendiente,
    /// Paid
    Pagado,
}

impl PaymentStatus {
    /// Upper-case label as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pendiente => "PENDIENTE",
            Self::Pagado => "PAGADO",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an installment was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Cash
    Efectivo,
    /// Yape mobile wallet
    Yape,
    /// Plin mobile wallet
    Plin,
    /// Bank transfer
    Transferencia,
}

impl PaymentMethod {
    /// Every accepted method, in display order.
    pub const ALL: [Self; 4] = [Self::Efectivo, Self::Yape, Self::Plin, Self::Transferencia];

    /// Upper-case label as stored.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Efectivo => "EFECTIVO",
            Self::Yape => "YAPE",
            Self::Plin => "PLIN",
            Self::Transferencia => "TRANSFERENCIA",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidPaymentMethod {
                value: s.to_string(),
            })
    }
}

/// One scheduled monthly payment of a contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInstallment {
    /// `"{contract_id}-{index}"`, index starting at 1
    pub id: String,
    /// Owning contract
    pub contract_id: i64,
    /// Owning property
    pub property_id: i64,
    /// Tenant name at generation time
    pub tenant_name: String,
    /// Room code at generation time
    pub room_code: String,
    /// Month and year of the due date, e.g. `"junio de 2025"`
    pub period_label: String,
    /// When the installment falls due
    pub due_date: NaiveDate,
    /// Rent at generation time
    pub amount: f64,
    /// Paid or pending
    pub status: PaymentStatus,
    /// Set once paid; stored as an empty string before that
    #[serde(default, with = "method_field")]
    pub method: Option<PaymentMethod>,
    /// Day the payment was registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
}

impl PaymentInstallment {
    /// Builds the composite installment id.
    #[must_use]
    pub fn make_id(contract_id: i64, index: i32) -> String {
        format!("{contract_id}-{index}")
    }

    /// True while the installment awaits payment.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pendiente
    }
}

/// Serializes an absent method as `""`, the way unpaid installments are stored.
mod method_field {
    use super::PaymentMethod;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(method: &Option<PaymentMethod>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(method.map_or("", PaymentMethod::as_str))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<PaymentMethod>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}
