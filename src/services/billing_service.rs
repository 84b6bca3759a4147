use crate::error::Result;
use crate::models::{
    Bill, BillForm, BillingItem, BillingItemForm, BillingTemplate, BillingTemplateForm,
    BulkPaymentUpdate, EntityId, EntityKind, PaymentReceipt, PaymentReceiptForm,
    RecalculateSummary, Tab, Validate,
};

use super::{collection_path, item_path, ApiClient, EntityApi};

const TEMPLATES: &str = "templates";
const ITEMS: &str = "items";
const BILLS: &str = "bills";
const RECEIPTS: &str = "payment-receipts";

// ============================================================================
// TEMPLATES
// ============================================================================

/// Client for `/templates`.
#[derive(Debug, Clone)]
pub struct BillingTemplateService {
    api: ApiClient,
}

impl BillingTemplateService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_templates(&self) -> Result<Vec<BillingTemplate>> {
        self.api.get_list(&collection_path(TEMPLATES), &[]).await
    }

    pub async fn get_template(&self, id: &EntityId) -> Result<BillingTemplate> {
        self.api.get_json(&item_path(TEMPLATES, id, None), &[]).await
    }

    pub async fn create_template(&self, form: &BillingTemplateForm) -> Result<BillingTemplate> {
        form.validate()?;
        self.api.post_json(&collection_path(TEMPLATES), form).await
    }

    pub async fn update_template(
        &self,
        id: &EntityId,
        form: &BillingTemplateForm,
    ) -> Result<BillingTemplate> {
        form.validate()?;
        self.api.put_json(&item_path(TEMPLATES, id, None), form).await
    }

    pub async fn delete_template(&self, id: &EntityId) -> Result<()> {
        self.api.delete(&item_path(TEMPLATES, id, None)).await
    }
}

// ============================================================================
// ITEMS
// ============================================================================

/// Client for `/items`.
#[derive(Debug, Clone)]
pub struct BillingItemService {
    api: ApiClient,
}

impl BillingItemService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_items(&self) -> Result<Vec<BillingItem>> {
        self.api.get_list(&collection_path(ITEMS), &[]).await
    }

    pub async fn get_item(&self, id: &EntityId) -> Result<BillingItem> {
        self.api.get_json(&item_path(ITEMS, id, None), &[]).await
    }

    pub async fn create_item(&self, form: &BillingItemForm) -> Result<BillingItem> {
        form.validate()?;
        self.api.post_json(&collection_path(ITEMS), form).await
    }

    pub async fn update_item(&self, id: &EntityId, form: &BillingItemForm) -> Result<BillingItem> {
        form.validate()?;
        self.api.put_json(&item_path(ITEMS, id, None), form).await
    }

    pub async fn delete_item(&self, id: &EntityId) -> Result<()> {
        self.api.delete(&item_path(ITEMS, id, None)).await
    }
}

// ============================================================================
// BILLS
// ============================================================================

/// Client for `/bills`, including the balance maintenance actions.
#[derive(Debug, Clone)]
pub struct BillService {
    api: ApiClient,
}

impl BillService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_bills(&self) -> Result<Vec<Bill>> {
        self.api.get_list(&collection_path(BILLS), &[]).await
    }

    pub async fn get_bill(&self, id: &EntityId) -> Result<Bill> {
        self.api.get_json(&item_path(BILLS, id, None), &[]).await
    }

    /// A bill and the receipts recorded against it, fetched concurrently.
    pub async fn bill_with_receipts(&self, id: &EntityId) -> Result<(Bill, Vec<PaymentReceipt>)> {
        let bill_id = id.to_string();
        let receipts_path = collection_path(RECEIPTS);
        let query = [("bill", bill_id.as_str())];
        futures::try_join!(
            self.get_bill(id),
            self.api.get_list::<PaymentReceipt>(&receipts_path, &query)
        )
    }

    pub async fn create_bill(&self, form: &BillForm) -> Result<Bill> {
        form.validate()?;
        self.api.post_json(&collection_path(BILLS), form).await
    }

    pub async fn delete_bill(&self, id: &EntityId) -> Result<()> {
        self.api.delete(&item_path(BILLS, id, None)).await
    }

    /// Ask the backend to recompute every outstanding balance.
    pub async fn recalculate_balances(&self) -> Result<RecalculateSummary> {
        self.api
            .post_action(&collection_path(BILLS).push("recalculate-balances"))
            .await
    }

    /// Record payments against several bills at once. Returns the bills as
    /// the backend now sees them.
    pub async fn bulk_payment_update(&self, update: &BulkPaymentUpdate) -> Result<Vec<Bill>> {
        update.validate()?;
        let bills: Vec<Bill> = self
            .api
            .post_json(&collection_path(BILLS).push("bulk-payment-update"), update)
            .await?;
        tracing::info!(
            target: "schooldesk::api",
            requested = update.updates.len(),
            returned = bills.len(),
            "bulk payment update applied"
        );
        Ok(bills)
    }
}

impl EntityApi for BillService {
    type Item = Bill;

    const KIND: EntityKind = EntityKind::Bill;

    // Bills have no server-side tabs; every tab is the full collection.
    async fn list(&self, _tab: Tab) -> Result<Vec<Bill>> {
        self.list_bills().await
    }

    async fn delete(&self, id: &EntityId) -> Result<()> {
        self.delete_bill(id).await
    }
}

// ============================================================================
// RECEIPTS
// ============================================================================

/// Client for `/payment-receipts`.
#[derive(Debug, Clone)]
pub struct ReceiptService {
    api: ApiClient,
}

impl ReceiptService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list_receipts(&self) -> Result<Vec<PaymentReceipt>> {
        self.api.get_list(&collection_path(RECEIPTS), &[]).await
    }

    pub async fn get_receipt(&self, id: &EntityId) -> Result<PaymentReceipt> {
        self.api.get_json(&item_path(RECEIPTS, id, None), &[]).await
    }

    pub async fn create_receipt(&self, form: &PaymentReceiptForm) -> Result<PaymentReceipt> {
        form.validate()?;
        self.api.post_json(&collection_path(RECEIPTS), form).await
    }

    pub async fn delete_receipt(&self, id: &EntityId) -> Result<()> {
        self.api.delete(&item_path(RECEIPTS, id, None)).await
    }
}

impl EntityApi for ReceiptService {
    type Item = PaymentReceipt;

    const KIND: EntityKind = EntityKind::PaymentReceipt;

    async fn list(&self, _tab: Tab) -> Result<Vec<PaymentReceipt>> {
        self.list_receipts().await
    }

    async fn delete(&self, id: &EntityId) -> Result<()> {
        self.delete_receipt(id).await
    }
}
