use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::error::DaoLayerError;
use super::{DaoBase, DaoResult, PaginatedResponse};
use crate::db::entities::{
    invoice, invoice_line, payment,
    prelude::{Invoice, InvoiceLine, Payment},
};

#[derive(Clone)]
pub struct InvoiceDao {
    db: DatabaseConnection,
}

impl DaoBase for InvoiceDao {
    type Entity = Invoice;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl InvoiceDao {
    pub async fn find_by_number(&self, number: &str) -> DaoResult<Option<invoice::Model>> {
        let number = number.to_string();
        self.find(1, 1, None, move |query| {
            query.filter(invoice::Column::Number.eq(number))
        })
        .await
        .map(|response| response.data.into_iter().next())
    }

    pub async fn list_for_franchise(
        &self,
        franchise_id: &Uuid,
        status: Option<&str>,
        page: u64,
        page_size: u64,
    ) -> DaoResult<PaginatedResponse<invoice::Model>> {
        let franchise_id = *franchise_id;
        let status = status.map(str::to_string);
        self.find(page, page_size, None, move |query| {
            let query = query.filter(invoice::Column::FranchiseId.eq(franchise_id));
            match status {
                Some(status) => query.filter(invoice::Column::Status.eq(status)),
                None => query,
            }
        })
        .await
    }

    pub async fn set_status(&self, id: &Uuid, status: &str) -> DaoResult<invoice::Model> {
        let status = status.to_string();
        self.update(*id, move |active| {
            active.status = Set(status);
        })
        .await
    }
}

#[derive(Clone)]
pub struct InvoiceLineDao {
    db: DatabaseConnection,
}

impl DaoBase for InvoiceLineDao {
    type Entity = InvoiceLine;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl InvoiceLineDao {
    /// Every line for the invoice, oldest first. Lines are never paged;
    /// totals are computed over all of them.
    pub async fn lines_for_invoice(&self, invoice_id: &Uuid) -> DaoResult<Vec<invoice_line::Model>> {
        InvoiceLine::find()
            .filter(invoice_line::Column::InvoiceId.eq(*invoice_id))
            .order_by_asc(invoice_line::Column::CreatedAt)
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn create_line(
        &self,
        invoice_id: &Uuid,
        item_id: &Uuid,
        description: &str,
        quantity: i64,
        unit_price_cents: i64,
        line_total_cents: i64,
    ) -> DaoResult<invoice_line::Model> {
        let model = invoice_line::ActiveModel {
            invoice_id: Set(*invoice_id),
            item_id: Set(*item_id),
            description: Set(description.to_string()),
            quantity: Set(quantity),
            unit_price_cents: Set(unit_price_cents),
            line_total_cents: Set(line_total_cents),
            ..Default::default()
        };
        self.create(model).await
    }
}

#[derive(Clone)]
pub struct PaymentDao {
    db: DatabaseConnection,
}

impl DaoBase for PaymentDao {
    type Entity = Payment;

    fn from_db(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl PaymentDao {
    /// Every payment against the invoice, oldest first. The balance and
    /// status rollup depend on the full set, so this is never paged.
    pub async fn payments_for_invoice(&self, invoice_id: &Uuid) -> DaoResult<Vec<payment::Model>> {
        Payment::find()
            .filter(payment::Column::InvoiceId.eq(*invoice_id))
            .order_by_asc(payment::Column::CreatedAt)
            .all(self.db())
            .await
            .map_err(DaoLayerError::Db)
    }

    pub async fn paid_total_cents(&self, invoice_id: &Uuid) -> DaoResult<i64> {
        let payments = self.payments_for_invoice(invoice_id).await?;
        Ok(payments.iter().map(|payment| payment.amount_cents).sum())
    }

    pub async fn create_payment(
        &self,
        invoice_id: &Uuid,
        amount_cents: i64,
        method: &str,
        reference: Option<&str>,
    ) -> DaoResult<payment::Model> {
        let model = payment::ActiveModel {
            invoice_id: Set(*invoice_id),
            amount_cents: Set(amount_cents),
            method: Set(method.to_string()),
            reference: Set(reference.map(str::to_string)),
            ..Default::default()
        };
        self.create(model).await
    }
}
