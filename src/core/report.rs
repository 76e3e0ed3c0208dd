//! Payment report generation.
//!
//! Read-side helpers that turn a property's installment list into the views
//! the front end shows: pending payments, payment history, per-tenant
//! filtering and summary totals. All functions except
//! [`LedgerStore::generate_property_report`] are pure and work on slices.

use super::{ledger::LedgerStore, schedule::format_human_date};
use crate::{
    errors::Result,
    models::{PaymentInstallment, PaymentStatus},
    storage::KeyValueStore,
};
use chrono::NaiveDate;
use std::{cmp::Reverse, collections::BTreeSet, fmt::Write};

/// Count and total amount of a group of installments.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bucket {
    /// Number of installments
    pub count: usize,
    /// Sum of their amounts
    pub total: f64,
}

impl Bucket {
    fn add(&mut self, amount: f64) {
        self.count += 1;
        self.total += amount;
    }
}

/// Totals shown at the top of the payments view.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PaymentSummary {
    /// Every unpaid installment
    pub pending: Bucket,
    /// Unpaid installments whose due date has passed (a subset of `pending`)
    pub overdue: Bucket,
    /// Paid installments
    pub paid: Bucket,
}

/// Everything the payments view needs for one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyReport {
    /// Property reported on
    pub property_id: i64,
    /// Unpaid installments, earliest due first
    pub pending: Vec<PaymentInstallment>,
    /// Paid installments, latest payment first
    pub history: Vec<PaymentInstallment>,
    /// Totals over `pending` and `history`
    pub summary: PaymentSummary,
}

impl<S: KeyValueStore> LedgerStore<S> {
    /// Builds the payments view of a property, optionally narrowed to one tenant.
    pub async fn generate_property_report(
        &self,
        property_id: i64,
        tenant_name: Option<&str>,
        today: NaiveDate,
    ) -> Result<PropertyReport> {
        let mut payments = self.payments(property_id).await?;
        if let Some(tenant) = tenant_name {
            payments = filter_by_tenant(&payments, tenant);
        }

        Ok(PropertyReport {
            property_id,
            summary: summarize(&payments, today),
            pending: pending_payments(&payments),
            history: payment_history(&payments),
        })
    }
}

/// Unpaid installments ordered by due date, then id.
#[must_use]
pub fn pending_payments(payments: &[PaymentInstallment]) -> Vec<PaymentInstallment> {
    let mut pending: Vec<PaymentInstallment> = payments
        .iter()
        .filter(|p| p.is_pending())
        .cloned()
        .collect();
    pending.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));
    pending
}

/// Paid installments, most recently paid first.
#[must_use]
pub fn payment_history(payments: &[PaymentInstallment]) -> Vec<PaymentInstallment> {
    let mut paid: Vec<PaymentInstallment> = payments
        .iter()
        .filter(|p| p.status == PaymentStatus::Pagado)
        .cloned()
        .collect();
    // Stable sort keeps storage order among payments made the same day
    paid.sort_by_key(|p| Reverse(p.payment_date));
    paid
}

/// Installments billed to `tenant_name`.
#[must_use]
pub fn filter_by_tenant(payments: &[PaymentInstallment], tenant_name: &str) -> Vec<PaymentInstallment> {
    payments
        .iter()
        .filter(|p| p.tenant_name == tenant_name)
        .cloned()
        .collect()
}

/// Distinct tenant names, sorted.
#[must_use]
pub fn tenant_names(payments: &[PaymentInstallment]) -> Vec<String> {
    payments
        .iter()
        .map(|p| p.tenant_name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Counts and totals pending, overdue and paid installments as of `today`.
#[must_use]
pub fn summarize(payments: &[PaymentInstallment], today: NaiveDate) -> PaymentSummary {
    let mut summary = PaymentSummary::default();
    for p in payments {
        match p.status {
            PaymentStatus::Pagado => summary.paid.add(p.amount),
            PaymentStatus::Pendiente => {
                summary.pending.add(p.amount);
                if p.due_date < today {
                    summary.overdue.add(p.amount);
                }
            }
        }
    }
    summary
}

/// Formats an amount in soles with thousands separators, e.g. `"S/ 1,234.50"`.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}S/ {grouped}.{cents}")
}

/// One line per installment, ready for a chat message.
#[must_use]
pub fn format_payment_table(payments: &[PaymentInstallment]) -> String {
    let mut table = String::new();
    for p in payments {
        // write! is infallible when writing to String
        let _ = write!(
            table,
            "`{}` | {} | {} | {} | vence {} | {}",
            p.id,
            p.tenant_name,
            p.room_code,
            p.period_label,
            format_human_date(p.due_date),
            format_amount(p.amount),
        );
        if let (Some(method), Some(paid_on)) = (p.method, p.payment_date) {
            let _ = write!(table, " | {method} {}", format_human_date(paid_on));
        }
        table.push('\n');
    }
    table
}

/// Multi-line rendering of a [`PaymentSummary`].
#[must_use]
pub fn format_summary(summary: &PaymentSummary) -> String {
    format!(
        "Pendientes: {} ({})\nVencidas: {} ({})\nPagadas: {} ({})",
        summary.pending.count,
        format_amount(summary.pending.total),
        summary.overdue.count,
        format_amount(summary.overdue.total),
        summary.paid.count,
        format_amount(summary.paid.total),
    )
}
