use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::db::dao::{
    CustomerDao, DaoBase, FranchiseDao, InvoiceDao, InvoiceLineDao, ItemDao, PaginatedResponse,
    PaymentDao, StoreDao,
};
use crate::db::entities::{invoice, invoice_line, payment};
use crate::error::AppError;

pub const BPS_DENOMINATOR: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Draft,
    Issued,
    PartiallyPaid,
    Paid,
    Void,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Issued => "issued",
            InvoiceStatus::PartiallyPaid => "partially_paid",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Void => "void",
        }
    }

    /// Open invoices are the only ones that accept payments.
    pub fn is_open(&self) -> bool {
        matches!(self, InvoiceStatus::Issued | InvoiceStatus::PartiallyPaid)
    }
}

impl TryFrom<&str> for InvoiceStatus {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "draft" => Ok(InvoiceStatus::Draft),
            "issued" => Ok(InvoiceStatus::Issued),
            "partially_paid" => Ok(InvoiceStatus::PartiallyPaid),
            "paid" => Ok(InvoiceStatus::Paid),
            "void" => Ok(InvoiceStatus::Void),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Eft,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Eft => "eft",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewInvoiceLine {
    pub item_id: Uuid,
    pub quantity: i64,
    /// Overrides the catalog price when present.
    pub unit_price_cents: Option<i64>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceDraft {
    pub store_id: Uuid,
    pub customer_id: Uuid,
    pub number: String,
    pub due_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    pub lines: Vec<NewInvoiceLine>,
}

#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    pub invoice: invoice::Model,
    pub lines: Vec<invoice_line::Model>,
    pub payments: Vec<payment::Model>,
    pub paid_total_cents: i64,
    pub balance_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct PaymentOutcome {
    pub payment: payment::Model,
    pub invoice: invoice::Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal_cents: i64,
    pub tax_total_cents: i64,
    pub grand_total_cents: i64,
}

/// VAT is charged on the whole invoice, not per line, and truncates toward
/// zero. Non-registered franchises never charge tax. Returns `None` when the
/// amounts do not fit in `i64` cents; line totals come from client-supplied
/// quantities, so overflow here is an input problem, not a bug.
pub fn compute_totals(
    line_totals: &[i64],
    vat_registered: bool,
    vat_rate_bps: u32,
) -> Option<Totals> {
    let subtotal_cents = line_totals
        .iter()
        .try_fold(0i64, |acc, total| acc.checked_add(*total))?;
    let tax_total_cents = if vat_registered {
        subtotal_cents.checked_mul(i64::from(vat_rate_bps))? / BPS_DENOMINATOR
    } else {
        0
    };
    Some(Totals {
        subtotal_cents,
        tax_total_cents,
        grand_total_cents: subtotal_cents.checked_add(tax_total_cents)?,
    })
}

pub fn next_status(paid_cents: i64, grand_total_cents: i64) -> InvoiceStatus {
    if paid_cents >= grand_total_cents {
        InvoiceStatus::Paid
    } else {
        InvoiceStatus::PartiallyPaid
    }
}

pub struct InvoiceService {
    franchises: FranchiseDao,
    stores: StoreDao,
    customers: CustomerDao,
    items: ItemDao,
    invoices: InvoiceDao,
    lines: InvoiceLineDao,
    payments: PaymentDao,
    vat_rate_bps: u32,
}

impl InvoiceService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        franchises: FranchiseDao,
        stores: StoreDao,
        customers: CustomerDao,
        items: ItemDao,
        invoices: InvoiceDao,
        lines: InvoiceLineDao,
        payments: PaymentDao,
        vat_rate_bps: u32,
    ) -> Self {
        Self {
            franchises,
            stores,
            customers,
            items,
            invoices,
            lines,
            payments,
            vat_rate_bps,
        }
    }

    pub async fn create(
        &self,
        franchise_id: Uuid,
        draft: InvoiceDraft,
    ) -> Result<InvoiceDetail, AppError> {
        let number = draft.number.trim().to_string();
        if number.is_empty() {
            return Err(AppError::bad_request("invoice number is required"));
        }
        if draft.lines.is_empty() {
            return Err(AppError::bad_request("invoice needs at least one line"));
        }
        for line in &draft.lines {
            if line.quantity <= 0 {
                return Err(AppError::bad_request("line quantity must be positive"));
            }
            if line.unit_price_cents.is_some_and(|price| price < 0) {
                return Err(AppError::bad_request("line price cannot be negative"));
            }
        }

        let franchise = self.franchises.find_by_id(franchise_id).await?;
        let store = self.stores.find_by_id(draft.store_id).await?;
        if store.franchise_id != franchise_id {
            return Err(AppError::bad_request(
                "store belongs to a different franchise",
            ));
        }
        let customer = self.customers.find_by_id(draft.customer_id).await?;
        if customer.franchise_id != franchise_id {
            return Err(AppError::bad_request(
                "customer belongs to a different franchise",
            ));
        }
        if self.invoices.find_by_number(&number).await?.is_some() {
            return Err(AppError::conflict("invoice number already in use"));
        }

        // Resolve lines against the catalog before writing anything.
        let mut resolved = Vec::with_capacity(draft.lines.len());
        for line in draft.lines {
            let item = self.items.find_by_id(line.item_id).await?;
            if item.franchise_id != franchise_id {
                return Err(AppError::bad_request(
                    "item belongs to a different franchise",
                ));
            }
            let unit_price_cents = line.unit_price_cents.unwrap_or(item.price_cents);
            let description = line.description.unwrap_or_else(|| item.name.clone());
            let line_total_cents = line
                .quantity
                .checked_mul(unit_price_cents)
                .ok_or_else(|| AppError::bad_request("invoice amount is too large"))?;
            resolved.push((
                item.id,
                description,
                line.quantity,
                unit_price_cents,
                line_total_cents,
            ));
        }

        let line_totals: Vec<i64> = resolved.iter().map(|line| line.4).collect();
        let totals = compute_totals(&line_totals, franchise.vat_registered, self.vat_rate_bps)
            .ok_or_else(|| AppError::bad_request("invoice amount is too large"))?;

        let created = self
            .invoices
            .create(invoice::ActiveModel {
                franchise_id: Set(franchise_id),
                store_id: Set(draft.store_id),
                customer_id: Set(draft.customer_id),
                number: Set(number),
                status: Set(InvoiceStatus::Draft.as_str().to_string()),
                subtotal_cents: Set(totals.subtotal_cents),
                tax_total_cents: Set(totals.tax_total_cents),
                grand_total_cents: Set(totals.grand_total_cents),
                issued_at: Set(None),
                due_at: Set(draft.due_at),
                ..Default::default()
            })
            .await?;

        let mut stored_lines = Vec::with_capacity(resolved.len());
        for (item_id, description, quantity, unit_price_cents, line_total_cents) in resolved {
            let stored = self
                .lines
                .create_line(
                    &created.id,
                    &item_id,
                    &description,
                    quantity,
                    unit_price_cents,
                    line_total_cents,
                )
                .await?;
            stored_lines.push(stored);
        }

        info!(
            invoice_id = %created.id,
            number = %created.number,
            grand_total_cents = totals.grand_total_cents,
            "created draft invoice"
        );
        Ok(InvoiceDetail {
            balance_cents: created.grand_total_cents,
            invoice: created,
            lines: stored_lines,
            payments: Vec::new(),
            paid_total_cents: 0,
        })
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<InvoiceDetail, AppError> {
        let invoice = self.invoices.find_by_id(id).await?;
        let lines = self.lines.lines_for_invoice(&id).await?;
        let payments = self.payments.payments_for_invoice(&id).await?;
        let paid_total_cents: i64 = payments.iter().map(|payment| payment.amount_cents).sum();

        Ok(InvoiceDetail {
            balance_cents: invoice.grand_total_cents - paid_total_cents,
            invoice,
            lines,
            payments,
            paid_total_cents,
        })
    }

    pub async fn list(
        &self,
        franchise_id: Uuid,
        status: Option<InvoiceStatus>,
        page: u64,
        page_size: u64,
    ) -> Result<PaginatedResponse<invoice::Model>, AppError> {
        Ok(self
            .invoices
            .list_for_franchise(
                &franchise_id,
                status.map(|status| status.as_str()),
                page,
                page_size,
            )
            .await?)
    }

    pub async fn issue(&self, id: Uuid) -> Result<invoice::Model, AppError> {
        let invoice = self.invoices.find_by_id(id).await?;
        if status_of(&invoice)? != InvoiceStatus::Draft {
            return Err(AppError::conflict("only draft invoices can be issued"));
        }

        let now = Utc::now().fixed_offset();
        let issued = self
            .invoices
            .update(id, move |active| {
                active.status = Set(InvoiceStatus::Issued.as_str().to_string());
                active.issued_at = Set(Some(now));
            })
            .await?;
        info!(invoice_id = %id, "issued invoice");
        Ok(issued)
    }

    pub async fn void(&self, id: Uuid) -> Result<invoice::Model, AppError> {
        let invoice = self.invoices.find_by_id(id).await?;
        match status_of(&invoice)? {
            InvoiceStatus::Paid => {
                return Err(AppError::conflict("paid invoices cannot be voided"));
            }
            InvoiceStatus::Void => {
                return Err(AppError::conflict("invoice is already void"));
            }
            _ => {}
        }

        let voided = self
            .invoices
            .set_status(&id, InvoiceStatus::Void.as_str())
            .await?;
        info!(invoice_id = %id, "voided invoice");
        Ok(voided)
    }

    pub async fn record_payment(
        &self,
        invoice_id: Uuid,
        amount_cents: i64,
        method: PaymentMethod,
        reference: Option<&str>,
    ) -> Result<PaymentOutcome, AppError> {
        if amount_cents <= 0 {
            return Err(AppError::bad_request("payment amount must be positive"));
        }

        let invoice = self.invoices.find_by_id(invoice_id).await?;
        if !status_of(&invoice)?.is_open() {
            return Err(AppError::conflict("invoice is not open for payment"));
        }

        let paid_cents = self.payments.paid_total_cents(&invoice_id).await?;
        let paid_after_cents = paid_cents
            .checked_add(amount_cents)
            .ok_or_else(|| AppError::bad_request("payment exceeds outstanding balance"))?;
        if paid_after_cents > invoice.grand_total_cents {
            return Err(AppError::bad_request("payment exceeds outstanding balance"));
        }

        let payment = self
            .payments
            .create_payment(&invoice_id, amount_cents, method.as_str(), reference)
            .await?;
        let status = next_status(paid_after_cents, invoice.grand_total_cents);
        let invoice = self.invoices.set_status(&invoice_id, status.as_str()).await?;

        info!(
            invoice_id = %invoice_id,
            amount_cents,
            method = %method.as_str(),
            status = %status,
            "recorded payment"
        );
        Ok(PaymentOutcome { payment, invoice })
    }
}

fn status_of(invoice: &invoice::Model) -> Result<InvoiceStatus, AppError> {
    InvoiceStatus::try_from(invoice.status.as_str())
        .map_err(|_| AppError::internal(format!("invoice {} has unknown status", invoice.id)))
}
