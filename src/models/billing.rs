use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{de_amount, BillStatus, EntityId};
use super::validate::{require, require_amount, Validate};
use crate::controllers::{ListItem, SortValue};
use crate::error::{DashboardError, Result};

// ============================================================================
// BILLING ITEMS AND TEMPLATES
// ============================================================================

/// A chargeable fee line (tuition, uniform, bus...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingItem {
    pub id: EntityId,
    pub name: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingItemForm {
    pub name: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for BillingItemForm {
    fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        require_amount("amount", self.amount)
    }
}

/// A reusable set of billing items, usually one per class and term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingTemplate {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<BillingItem>,
}

impl BillingTemplate {
    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.amount).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingTemplateForm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub item_ids: Vec<EntityId>,
}

impl Validate for BillingTemplateForm {
    fn validate(&self) -> Result<()> {
        require("name", &self.name)?;
        if self.item_ids.is_empty() {
            return Err(DashboardError::Validation(
                "a template needs at least one billing item".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// BILLS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: EntityId,
    #[serde(default)]
    pub bill_number: String,
    #[serde(alias = "student")]
    pub student_id: EntityId,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount_paid: f64,
    #[serde(default, deserialize_with = "de_amount")]
    pub balance: f64,
    #[serde(default)]
    pub due_date: Option<String>,
    pub status: BillStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BillFilter {
    Status,
    Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillSort {
    StudentName,
    DueDate,
    Amount,
    Balance,
}

impl ListItem for Bill {
    type Filter = BillFilter;
    type Sort = BillSort;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.student_name, self.bill_number)
    }

    fn filter_value(&self, key: BillFilter) -> Option<String> {
        match key {
            BillFilter::Status => Some(self.status.as_str().to_string()),
            BillFilter::Class => self.class_name.clone(),
        }
    }

    fn sort_value(&self, key: BillSort) -> SortValue {
        match key {
            BillSort::StudentName => SortValue::text(self.student_name.to_lowercase()),
            BillSort::DueDate => SortValue::date(self.due_date.as_deref()),
            BillSort::Amount => SortValue::number(self.amount),
            BillSort::Balance => SortValue::number(self.balance),
        }
    }
}

/// Body for `POST /bills/`. Either a template or explicit items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BillForm {
    pub student_id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub item_ids: Vec<EntityId>,
    pub due_date: Option<NaiveDate>,
}

impl Validate for BillForm {
    fn validate(&self) -> Result<()> {
        if self.student_id.is_none() {
            return Err(DashboardError::Validation("student is required".to_string()));
        }
        if self.due_date.is_none() {
            return Err(DashboardError::Validation("due date is required".to_string()));
        }
        if self.template_id.is_none() && self.item_ids.is_empty() {
            return Err(DashboardError::Validation(
                "choose a template or at least one billing item".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of `POST /bills/recalculate-balances/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecalculateSummary {
    #[serde(default, alias = "updated_count")]
    pub updated: u32,
    #[serde(default, alias = "detail")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentUpdate {
    pub bill_id: EntityId,
    pub amount_paid: f64,
}

/// Body for `POST /bills/bulk-payment-update/`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkPaymentUpdate {
    pub updates: Vec<PaymentUpdate>,
}

impl Validate for BulkPaymentUpdate {
    fn validate(&self) -> Result<()> {
        if self.updates.is_empty() {
            return Err(DashboardError::Validation(
                "select at least one bill to update".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for update in &self.updates {
            if !seen.insert(&update.bill_id) {
                return Err(DashboardError::Validation(format!(
                    "bill {} appears more than once",
                    update.bill_id
                )));
            }
            require_amount("amount paid", update.amount_paid)?;
        }
        Ok(())
    }
}

// ============================================================================
// PAYMENT RECEIPTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub id: EntityId,
    #[serde(default)]
    pub receipt_number: String,
    #[serde(alias = "bill")]
    pub bill_id: EntityId,
    #[serde(default)]
    pub student_name: String,
    #[serde(default, deserialize_with = "de_amount")]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub paid_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReceiptFilter {
    PaymentMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiptSort {
    StudentName,
    PaidAt,
    Amount,
}

impl ListItem for PaymentReceipt {
    type Filter = ReceiptFilter;
    type Sort = ReceiptSort;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn search_text(&self) -> String {
        format!(
            "{} {} {}",
            self.student_name,
            self.receipt_number,
            self.reference.as_deref().unwrap_or_default()
        )
    }

    fn filter_value(&self, key: ReceiptFilter) -> Option<String> {
        match key {
            ReceiptFilter::PaymentMethod => Some(self.payment_method.clone()),
        }
    }

    fn sort_value(&self, key: ReceiptSort) -> SortValue {
        match key {
            ReceiptSort::StudentName => SortValue::text(self.student_name.to_lowercase()),
            ReceiptSort::PaidAt => SortValue::date(self.paid_at.as_deref()),
            ReceiptSort::Amount => SortValue::number(self.amount),
        }
    }
}

/// Body for `POST /payment-receipts/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentReceiptForm {
    pub bill_id: EntityId,
    pub amount: f64,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    pub paid_at: NaiveDate,
}

impl Validate for PaymentReceiptForm {
    fn validate(&self) -> Result<()> {
        require("payment method", &self.payment_method)?;
        require_amount("amount", self.amount)?;
        if self.amount == 0.0 {
            return Err(DashboardError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bill_decodes_string_amounts() {
        let bill: Bill = serde_json::from_str(
            r#"{"id": 1, "student": 44, "student_name": "Amaka Eze", "amount": "150000.00",
                "amount_paid": "50000.00", "balance": "100000.00", "status": "partial"}"#,
        )
        .unwrap();
        assert_eq!(bill.student_id, EntityId::Number(44));
        assert_eq!(bill.balance, 100000.0);
        assert_eq!(bill.status, BillStatus::Partial);
    }

    #[test]
    fn null_amounts_read_as_zero() {
        let bill: Bill = serde_json::from_str(
            r#"{"id": 2, "student": 44, "amount": 150000, "amount_paid": null,
                "balance": "", "status": "unpaid"}"#,
        )
        .unwrap();
        assert_eq!(bill.amount, 150000.0);
        assert_eq!(bill.amount_paid, 0.0);
        assert_eq!(bill.balance, 0.0);
    }

    #[test]
    fn bulk_update_rejects_duplicates_and_empty() {
        assert!(BulkPaymentUpdate::default().validate().is_err());
        let dup = BulkPaymentUpdate {
            updates: vec![
                PaymentUpdate { bill_id: EntityId::Number(1), amount_paid: 10.0 },
                PaymentUpdate { bill_id: EntityId::Number(1), amount_paid: 20.0 },
            ],
        };
        assert!(dup.validate().is_err());
        let ok = BulkPaymentUpdate {
            updates: vec![
                PaymentUpdate { bill_id: EntityId::Number(1), amount_paid: 10.0 },
                PaymentUpdate { bill_id: EntityId::Number(2), amount_paid: 20.0 },
            ],
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn bill_form_needs_template_or_items() {
        let mut form = BillForm {
            student_id: Some(EntityId::Number(9)),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 31),
            ..Default::default()
        };
        assert!(form.validate().is_err());
        form.template_id = Some("term-1".into());
        assert!(form.validate().is_ok());
    }

    #[test]
    fn template_total_sums_items() {
        let template: BillingTemplate = serde_json::from_str(
            r#"{"id": 2, "name": "JSS1 Term 1", "items": [
                {"id": 1, "name": "Tuition", "amount": "120000"},
                {"id": 2, "name": "Uniform", "amount": 15000}
            ]}"#,
        )
        .unwrap();
        assert_eq!(template.total(), 135000.0);
    }
}
