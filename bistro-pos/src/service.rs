//! Till workflow service
//!
//! Runs the local workflows against a [`Backend`] and reports every outcome
//! through a [`Notifier`]. The order board is updated optimistically from the
//! backend's responses; the live channel corrects it afterwards.

use std::sync::Arc;

use bistro_client::ClientError;
use chrono::Utc;
use shared::message::{NotificationCategory, NotificationPayload};
use shared::models::{Invoice, Order, TableMap};
use tokio::sync::RwLock;

use crate::backend::Backend;
use crate::error::{PosError, PosResult};
use crate::live::OrderBoard;
use crate::notify::Notifier;
use crate::orders::{OrderEditor, SourceAction, SplitSession, merge_orders};
use crate::payment::{PaymentSession, Settlement, complete_payment};
use crate::table_map::TableMapEditor;

/// Outcome of a saved split
#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    pub destination: Order,
    /// `None` when the source was emptied and deleted
    pub source: Option<Order>,
}

pub struct PosService<B, N> {
    backend: B,
    notifier: N,
    board: Arc<RwLock<OrderBoard>>,
}

impl<B: Backend, N: Notifier> PosService<B, N> {
    pub fn new(backend: B, notifier: N) -> Self {
        Self {
            backend,
            notifier,
            board: Arc::new(RwLock::new(OrderBoard::new())),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Shared handle on the board, for [`crate::live::follow`]
    pub fn board(&self) -> Arc<RwLock<OrderBoard>> {
        self.board.clone()
    }

    fn report_failure(&self, title: &str, err: &PosError) {
        let category = match err {
            PosError::Client(ClientError::Http(_) | ClientError::WebSocket(_)) => {
                NotificationCategory::Network
            }
            _ => NotificationCategory::Business,
        };
        tracing::warn!(error = %err, "{title}");
        self.notifier
            .notify(NotificationPayload::error(title, err.to_string()).with_category(category));
    }

    fn reported<T>(&self, title: &str, result: PosResult<T>) -> PosResult<T> {
        if let Err(e) = &result {
            self.report_failure(title, e);
        }
        result
    }

    /// Reload open orders from the backend
    pub async fn refresh_board(&self) -> PosResult<usize> {
        let result = self.backend.open_orders().await.map_err(PosError::from);
        let orders = self.reported("Could not load orders", result)?;
        let mut board = self.board.write().await;
        board.replace_all(orders);
        tracing::info!(count = board.len(), "Order board refreshed");
        Ok(board.len())
    }

    /// Submit the invoice for `settlement`, then mark the order paid
    pub async fn pay(&self, order: &Order, settlement: &Settlement) -> PosResult<(Invoice, Order)> {
        let result = self.pay_inner(order, settlement).await;
        let (invoice, paid) = self.reported("Payment failed", result)?;

        let message = match settlement.change {
            change if change > 0.0 => format!("Order #{} paid, change {change:.2}", order.id),
            _ => format!("Order #{} paid", order.id),
        };
        self.notifier
            .notify(NotificationPayload::success("Payment completed", message));
        Ok((invoice, paid))
    }

    /// The card terminal declined the pending card part
    ///
    /// The session goes back to tendering with its tally intact and the
    /// decline is reported as a failed payment.
    pub fn decline_card(&self, session: &mut PaymentSession) -> PosResult<()> {
        let err = match session.decline_card() {
            Ok(()) => PosError::CardDeclined(session.order_id()),
            Err(e) => e,
        };
        self.report_failure("Payment failed", &err);
        Err(err)
    }

    async fn pay_inner(&self, order: &Order, settlement: &Settlement) -> PosResult<(Invoice, Order)> {
        let (invoice, settled) = complete_payment(order, settlement, Utc::now())?;

        let invoice = self.backend.create_invoice(&invoice).await?;
        tracing::info!(
            order_id = order.id,
            invoice_id = ?invoice.id,
            cash = invoice.paid_with_cash,
            card = invoice.paid_with_card,
            "Invoice emitted"
        );

        let saved = match self.backend.update_order(&settled).await {
            Ok(saved) => saved,
            Err(e) => {
                // The invoice exists; only the order flag is behind
                self.notifier.notify(NotificationPayload::warning(
                    "Order not updated",
                    format!("Invoice saved but order #{} is not marked paid: {e}", order.id),
                ));
                return Err(e.into());
            }
        };
        self.board.write().await.apply(saved.clone());
        Ok((invoice, saved))
    }

    /// Persist an edited order, creating it when it is new
    pub async fn save_order(&self, editor: OrderEditor) -> PosResult<Order> {
        let result = self.save_order_inner(editor).await;
        let saved = self.reported("Could not save order", result)?;
        self.notifier.notify(NotificationPayload::success(
            "Order saved",
            format!("Order #{} saved", saved.id),
        ));
        Ok(saved)
    }

    async fn save_order_inner(&self, editor: OrderEditor) -> PosResult<Order> {
        if !editor.is_dirty() && editor.order().id != 0 {
            return Ok(editor.finish());
        }
        let order = editor.finish();
        let saved = if order.id == 0 {
            if order.is_empty() {
                return Err(PosError::OrderEmpty(0));
            }
            self.backend.create_order(&order).await?
        } else {
            self.backend.update_order(&order).await?
        };
        self.board.write().await.apply(saved.clone());
        Ok(saved)
    }

    /// Merge `orders` into the first one and delete the rest
    pub async fn merge(&self, orders: Vec<Order>) -> PosResult<Order> {
        let result = self.merge_inner(orders).await;
        let merged = self.reported("Could not merge orders", result)?;
        self.notifier.notify(NotificationPayload::success(
            "Orders merged",
            format!("Merged into order #{}", merged.id),
        ));
        Ok(merged)
    }

    async fn merge_inner(&self, orders: Vec<Order>) -> PosResult<Order> {
        let outcome = merge_orders(orders)?;
        let merged = self.backend.update_order(&outcome.target).await?;
        for id in &outcome.removed {
            self.backend.delete_order(*id).await?;
        }

        let mut board = self.board.write().await;
        for id in &outcome.removed {
            board.remove(*id);
        }
        board.apply(merged.clone());
        Ok(merged)
    }

    /// Create the split-off order, then update or delete the source
    pub async fn split(&self, session: SplitSession) -> PosResult<SplitResult> {
        let result = self.split_inner(session).await;
        let split = self.reported("Could not split order", result)?;
        self.notifier.notify(NotificationPayload::success(
            "Order split",
            format!("New order #{}", split.destination.id),
        ));
        Ok(split)
    }

    async fn split_inner(&self, session: SplitSession) -> PosResult<SplitResult> {
        let plan = session.finish()?;
        let destination = self.backend.create_order(&plan.destination).await?;

        let source = match plan.source {
            SourceAction::Update(order) => Some(self.backend.update_order(&order).await?),
            SourceAction::Delete(id) => {
                self.backend.delete_order(id).await?;
                self.board.write().await.remove(id);
                None
            }
        };

        let mut board = self.board.write().await;
        board.apply(destination.clone());
        if let Some(source) = &source {
            board.apply(source.clone());
        }
        Ok(SplitResult {
            destination,
            source,
        })
    }

    /// Load the floor map into a fresh editor
    pub async fn load_map(&self) -> PosResult<TableMapEditor> {
        let result = self.backend.table_map().await.map_err(PosError::from);
        let map = self.reported("Could not load floor map", result)?;
        Ok(TableMapEditor::new(map))
    }

    /// Save the whole floor map; the editor is reset to what the backend stored
    pub async fn save_map(&self, editor: &mut TableMapEditor) -> PosResult<TableMap> {
        if !editor.is_dirty() {
            self.notifier
                .notify(NotificationPayload::info("Floor map", "No changes to save"));
            return Ok(editor.map().clone());
        }
        let result = self
            .backend
            .save_table_map(editor.map())
            .await
            .map_err(PosError::from);
        let saved = self.reported("Could not save floor map", result)?;
        editor.mark_saved(saved.clone());
        self.notifier.notify(NotificationPayload::success(
            "Floor map saved",
            format!("{} tables placed", saved.entries.len()),
        ));
        Ok(saved)
    }
}
