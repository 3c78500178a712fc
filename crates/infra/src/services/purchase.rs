use std::sync::Arc;

use chrono::Utc;
use serde_json::Value as JsonValue;

use signworks_core::{LineId, Lifecycle, PurchaseId, Sku};
use signworks_events::{EventBus, EventEnvelope};
use signworks_purchasing::{NewPurchase, Purchase, PurchaseLine, derive_line_figures};

use crate::repository::{PurchaseRepository, SupplierRepository};
use crate::services::price_book::{CreateEntryRequest, PriceBookService};
use crate::services::{ServiceError, ServiceResult};

/// Purchase recording: validate, derive line figures, store, then feed the
/// price book.
pub struct PurchaseService<B> {
    purchases: Arc<dyn PurchaseRepository>,
    suppliers: Arc<dyn SupplierRepository>,
    price_book: Arc<PriceBookService<B>>,
}

impl<B> PurchaseService<B>
where
    B: EventBus<EventEnvelope<JsonValue>>,
{
    pub fn new(
        purchases: Arc<dyn PurchaseRepository>,
        suppliers: Arc<dyn SupplierRepository>,
        price_book: Arc<PriceBookService<B>>,
    ) -> Self {
        Self {
            purchases,
            suppliers,
            price_book,
        }
    }

    /// Record a purchase and generate price-book entries for flagged lines.
    ///
    /// All validation happens before any storage write. Entry generation is
    /// per line and best-effort: a failing line is logged and skipped so the
    /// rest of the purchase still lands.
    pub fn save_purchase(&self, input: NewPurchase) -> ServiceResult<Purchase> {
        let now = Utc::now();
        input.validate(now)?;

        match self.suppliers.get(input.supplier_id) {
            Some(supplier) if supplier.is_active() => {}
            _ => return Err(ServiceError::UnknownSupplier(input.supplier_id)),
        }

        if self.purchases.find_by_invoice(&input.invoice_no).is_some() {
            return Err(ServiceError::Domain(signworks_core::DomainError::conflict(
                format!("invoice {} already recorded", input.invoice_no),
            )));
        }

        let purchase_id = PurchaseId::new();
        let mut lines = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            let figures = derive_line_figures(line)?;
            lines.push(PurchaseLine {
                id: LineId::new(),
                purchase_id,
                product: line.product.clone(),
                unit_type: line.unit_type,
                units: line.units,
                width: line.width,
                height: line.height,
                uom: line.uom,
                unit_cost: line.unit_cost,
                generate_price: line.generate_price,
                figures,
                lifecycle: Lifecycle::Active,
            });
        }

        let purchase = Purchase {
            id: purchase_id,
            invoice_no: input.invoice_no,
            supplier_id: input.supplier_id,
            date: input.date,
            currency: input.currency,
            subtotal: input.subtotal,
            tax: input.tax,
            shipping: input.shipping,
            notes: input.notes,
            lifecycle: Lifecycle::Active,
            lines,
        };
        self.purchases.insert(purchase.clone())?;

        let generated = self.generate_price_entries(&purchase);
        tracing::info!(
            purchase = %purchase.id,
            invoice = %purchase.invoice_no,
            entries = generated,
            "purchase saved"
        );
        Ok(purchase)
    }

    /// Create one price-book entry per flagged, linked, determinate line.
    fn generate_price_entries(&self, purchase: &Purchase) -> usize {
        let mut generated = 0;
        for line in &purchase.lines {
            let Some(sku) = &line.product else { continue };
            if !line.generate_price {
                continue;
            }
            // Lines whose area is undetermined (rolls) cannot price anything;
            // skipping is the explicit "cannot compute" path, not a zero.
            let Some(cost_per_area) = line.figures.cost_per_area else {
                tracing::warn!(
                    purchase = %purchase.id,
                    line = %line.id,
                    "line has no derivable cost per area; no price entry generated"
                );
                continue;
            };

            let request = CreateEntryRequest {
                supplier_id: Some(purchase.supplier_id),
                source_line_id: Some(line.id),
                effective_date: purchase.date,
                cost_per_area,
                currency: purchase.currency.clone(),
                pinned: false,
                notes: Some(format!(
                    "generated from purchase {}, line {}",
                    purchase.invoice_no, line.id
                )),
            };

            match self.price_book.create_entry(sku, request) {
                Ok(_) => generated += 1,
                Err(error) => {
                    // Keep processing the remaining lines.
                    tracing::warn!(
                        purchase = %purchase.id,
                        line = %line.id,
                        sku = %sku,
                        %error,
                        "price entry generation failed"
                    );
                }
            }
        }
        generated
    }

    pub fn get_by_id(&self, id: PurchaseId) -> Option<Purchase> {
        self.purchases.get(id)
    }

    pub fn get_by_invoice(&self, invoice_no: &str) -> Option<Purchase> {
        self.purchases.find_by_invoice(invoice_no)
    }

    pub fn list(&self) -> Vec<Purchase> {
        self.purchases.list()
    }

    /// SKUs touched by a purchase's generated entries. Handy for callers
    /// that keep product `cost_per_area` in sync with the book.
    pub fn affected_skus(purchase: &Purchase) -> Vec<Sku> {
        let mut skus: Vec<Sku> = purchase
            .lines
            .iter()
            .filter(|l| l.generate_price && l.figures.cost_per_area.is_some())
            .filter_map(|l| l.product.clone())
            .collect();
        skus.sort();
        skus.dedup();
        skus
    }
}
