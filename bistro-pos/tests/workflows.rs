//! End-to-end till workflows against an in-memory backend

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bistro_client::{ClientError, ClientResult};
use bistro_pos::orders::MoveAmount;
use bistro_pos::payment::{Denomination, PaymentMode, PaymentSession, PaymentStage};
use bistro_pos::{Backend, Notifier, OrderEditor, PosError, PosService, SplitSession};
use shared::message::{NotificationLevel, NotificationPayload};
use shared::models::{
    Invoice, MenuItemRef, Order, OrderItem, OrderStatus, Product, Table, TableMap, TableShape,
};

#[derive(Default)]
struct State {
    orders: BTreeMap<i64, Order>,
    invoices: Vec<Invoice>,
    map: TableMap,
    next_id: i64,
    calls: Vec<String>,
    fail_update: bool,
}

#[derive(Clone, Default)]
struct MemoryBackend {
    state: Arc<Mutex<State>>,
}

impl MemoryBackend {
    fn with_orders(orders: Vec<Order>) -> Self {
        let backend = Self::default();
        {
            let mut state = backend.state.lock().unwrap();
            for order in orders {
                state.next_id = state.next_id.max(order.id);
                state.orders.insert(order.id, order);
            }
        }
        backend
    }

    fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    fn order(&self, id: i64) -> Option<Order> {
        self.state.lock().unwrap().orders.get(&id).cloned()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn open_orders(&self) -> ClientResult<Vec<Order>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("GET /orders/full".into());
        Ok(state.orders.values().cloned().collect())
    }

    async fn create_order(&self, order: &Order) -> ClientResult<Order> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("POST /orders".into());
        state.next_id += 1;
        let mut saved = order.clone();
        saved.id = state.next_id;
        for (i, item) in saved.items.iter_mut().enumerate() {
            item.id = saved.id * 100 + i as i64;
        }
        state.orders.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn update_order(&self, order: &Order) -> ClientResult<Order> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("PUT /orders/{}", order.id));
        if state.fail_update {
            return Err(ClientError::Validation("backend rejected the order".into()));
        }
        if !state.orders.contains_key(&order.id) {
            return Err(ClientError::NotFound(format!("order {}", order.id)));
        }
        state.orders.insert(order.id, order.clone());
        Ok(order.clone())
    }

    async fn delete_order(&self, order_id: i64) -> ClientResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("DELETE /orders/{order_id}"));
        state
            .orders
            .remove(&order_id)
            .map(|_| ())
            .ok_or_else(|| ClientError::NotFound(format!("order {order_id}")))
    }

    async fn create_invoice(&self, invoice: &Invoice) -> ClientResult<Invoice> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("POST /invoice".into());
        let mut saved = invoice.clone();
        saved.id = Some(state.invoices.len() as i64 + 1);
        state.invoices.push(saved.clone());
        Ok(saved)
    }

    async fn products(&self) -> ClientResult<Vec<Product>> {
        Ok(vec![product(1, 4.5)])
    }

    async fn table_map(&self) -> ClientResult<TableMap> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("GET /map".into());
        Ok(state.map.clone())
    }

    async fn save_table_map(&self, map: &TableMap) -> ClientResult<TableMap> {
        let mut state = self.state.lock().unwrap();
        state.calls.push("POST /map".into());
        let mut saved = map.clone();
        for (i, entry) in saved.entries.iter_mut().enumerate() {
            if entry.id < 0 {
                entry.id = 1000 + i as i64;
            }
        }
        state.map = saved.clone();
        Ok(saved)
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    seen: Arc<Mutex<Vec<NotificationPayload>>>,
}

impl RecordingNotifier {
    fn levels(&self) -> Vec<NotificationLevel> {
        self.seen.lock().unwrap().iter().map(|n| n.level).collect()
    }

    fn last(&self) -> NotificationPayload {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, payload: NotificationPayload) {
        self.seen.lock().unwrap().push(payload);
    }
}

fn product(id: i64, price: f64) -> Product {
    Product {
        id,
        name: format!("Product {id}"),
        description: None,
        price,
        tax: 0.0,
        category: None,
        image_url: None,
        available: true,
    }
}

fn line(id: i64, menu_item_id: i64, quantity: u32, price: f64) -> OrderItem {
    OrderItem {
        id,
        menu_item: MenuItemRef {
            id: menu_item_id,
            name: format!("Dish {menu_item_id}"),
        },
        quantity,
        price,
        tax: 0.0,
        note: None,
        completed: false,
    }
}

fn order(id: i64, table_id: i64, status: OrderStatus, items: Vec<OrderItem>) -> Order {
    let mut order = Order::new(Some(table_id));
    order.id = id;
    order.status = status;
    order.items = items;
    bistro_pos::orders::recompute_totals(&mut order);
    order
}

fn service(backend: &MemoryBackend) -> (PosService<MemoryBackend, RecordingNotifier>, RecordingNotifier) {
    let notifier = RecordingNotifier::default();
    (PosService::new(backend.clone(), notifier.clone()), notifier)
}

fn d(value: f64) -> Denomination {
    Denomination::from_value(value).unwrap()
}

#[tokio::test]
async fn test_cash_payment_finishes_completed_order() {
    let target = order(1, 3, OrderStatus::Completed, vec![line(10, 5, 1, 12.5)]);
    let backend = MemoryBackend::with_orders(vec![target.clone()]);
    let (service, notifier) = service(&backend);
    service.refresh_board().await.unwrap();

    let mut session = PaymentSession::new(&target, PaymentMode::Cash).unwrap();
    session.add(d(10.0)).unwrap();
    session.add(d(2.0)).unwrap();
    session.add(d(0.5)).unwrap();
    assert_eq!(session.change(), 0.0);
    session.confirm().unwrap();
    let settlement = *session.settlement().unwrap();

    let (invoice, paid) = service.pay(&target, &settlement).await.unwrap();
    assert_eq!(invoice.paid_with_cash, 12.5);
    assert_eq!(invoice.paid_with_card, 0.0);
    assert_eq!(invoice.order_id, 1);
    assert!(paid.paid);
    assert_eq!(paid.status, OrderStatus::Finished);

    assert_eq!(backend.calls()[1..], ["POST /invoice", "PUT /orders/1"]);
    assert!(backend.order(1).unwrap().paid);
    // finished and paid leaves the board
    assert!(service.board().read().await.is_empty());
    assert_eq!(notifier.last().level, NotificationLevel::Success);
}

#[tokio::test]
async fn test_mixed_payment_keeps_open_status() {
    let target = order(2, 4, OrderStatus::InProgress, vec![line(20, 5, 2, 10.0)]);
    let backend = MemoryBackend::with_orders(vec![target.clone()]);
    let (service, _) = service(&backend);

    let mut session = PaymentSession::new(&target, PaymentMode::Mixed).unwrap();
    session.set(d(10.0), 1).unwrap();
    session.set(d(1.0), 2).unwrap();
    session.confirm().unwrap();
    let settlement = session.approve_card().unwrap();

    let (invoice, paid) = service.pay(&target, &settlement).await.unwrap();
    assert_eq!(invoice.paid_with_cash, 12.0);
    assert_eq!(invoice.paid_with_card, 8.0);
    assert!(paid.paid);
    assert_eq!(paid.status, OrderStatus::InProgress);
    assert_eq!(service.board().read().await.len(), 1);
}

#[tokio::test]
async fn test_unpaid_finished_order_is_settled() {
    let target = order(5, 2, OrderStatus::Finished, vec![line(50, 5, 1, 10.0)]);
    let backend = MemoryBackend::with_orders(vec![target.clone()]);
    let (service, _) = service(&backend);
    service.refresh_board().await.unwrap();
    assert_eq!(service.board().read().await.len(), 1);

    let mut session = PaymentSession::new(&target, PaymentMode::Cash).unwrap();
    session.add(d(10.0)).unwrap();
    session.confirm().unwrap();
    let settlement = *session.settlement().unwrap();

    let (invoice, paid) = service.pay(&target, &settlement).await.unwrap();
    assert_eq!(invoice.paid_with_cash, 10.0);
    assert!(paid.paid);
    assert_eq!(paid.status, OrderStatus::Finished);
    assert!(service.board().read().await.is_empty());
}

#[tokio::test]
async fn test_declined_card_is_reported() {
    let target = order(6, 2, OrderStatus::Completed, vec![line(60, 5, 2, 10.0)]);
    let backend = MemoryBackend::with_orders(vec![target.clone()]);
    let (service, notifier) = service(&backend);

    let mut session = PaymentSession::new(&target, PaymentMode::Mixed).unwrap();
    session.add(d(5.0)).unwrap();
    session.confirm().unwrap();

    let err = service.decline_card(&mut session).unwrap_err();
    assert!(matches!(err, PosError::CardDeclined(6)));
    assert_eq!(session.stage(), &PaymentStage::Tendering);
    assert_eq!(session.cash_total(), 5.0);
    let last = notifier.last();
    assert_eq!(last.level, NotificationLevel::Error);
    assert_eq!(last.message, "Card payment for order 6 was declined");

    // nothing pending any more
    assert!(matches!(
        service.decline_card(&mut session),
        Err(PosError::InvalidStage(_))
    ));
    assert!(backend.state.lock().unwrap().invoices.is_empty());
}

#[tokio::test]
async fn test_paying_twice_is_rejected() {
    let target = order(3, 1, OrderStatus::Completed, vec![line(30, 5, 1, 5.0)]);
    let backend = MemoryBackend::with_orders(vec![target.clone()]);
    let (service, notifier) = service(&backend);

    let mut session = PaymentSession::new(&target, PaymentMode::Card).unwrap();
    session.confirm().unwrap();
    let settlement = session.approve_card().unwrap();
    let (_, paid) = service.pay(&target, &settlement).await.unwrap();

    let err = service.pay(&paid, &settlement).await.unwrap_err();
    assert!(matches!(err, PosError::OrderAlreadyPaid(3)));
    assert_eq!(notifier.last().level, NotificationLevel::Error);
    assert_eq!(backend.state.lock().unwrap().invoices.len(), 1);
}

#[tokio::test]
async fn test_order_update_failure_after_invoice_is_reported() {
    let target = order(4, 1, OrderStatus::Completed, vec![line(40, 5, 1, 5.0)]);
    let backend = MemoryBackend::with_orders(vec![target.clone()]);
    backend.state.lock().unwrap().fail_update = true;
    let (service, notifier) = service(&backend);

    let mut session = PaymentSession::new(&target, PaymentMode::Cash).unwrap();
    session.add(d(5.0)).unwrap();
    session.confirm().unwrap();
    let settlement = *session.settlement().unwrap();

    assert!(service.pay(&target, &settlement).await.is_err());
    assert_eq!(
        notifier.levels(),
        vec![NotificationLevel::Warning, NotificationLevel::Error]
    );
}

#[tokio::test]
async fn test_save_new_order() {
    let backend = MemoryBackend::default();
    let (service, _) = service(&backend);

    let mut editor = OrderEditor::new_for_table(9);
    editor.add_product(&product(1, 4.5), None).unwrap();
    editor.add_product(&product(1, 4.5), None).unwrap();
    let saved = service.save_order(editor).await.unwrap();

    assert_eq!(saved.id, 1);
    assert_eq!(saved.items[0].quantity, 2);
    assert_eq!(saved.total_with_tax, 9.0);
    assert_eq!(service.board().read().await.get(1).unwrap().table_id, Some(9));

    let empty = OrderEditor::new_for_table(9);
    assert!(matches!(
        service.save_order(empty).await,
        Err(PosError::OrderEmpty(0))
    ));
}

#[tokio::test]
async fn test_merge_updates_first_and_deletes_rest() {
    let a = order(1, 1, OrderStatus::Pending, vec![line(10, 5, 1, 3.0)]);
    let b = order(2, 1, OrderStatus::InProgress, vec![line(20, 5, 2, 3.0)]);
    let c = order(3, 2, OrderStatus::Pending, vec![line(30, 6, 1, 7.0)]);
    let backend = MemoryBackend::with_orders(vec![a.clone(), b.clone(), c.clone()]);
    let (service, _) = service(&backend);
    service.refresh_board().await.unwrap();

    let merged = service.merge(vec![a, b, c]).await.unwrap();
    assert_eq!(merged.id, 1);
    assert_eq!(merged.items.len(), 2);
    assert_eq!(merged.items[0].quantity, 3);
    assert_eq!(merged.total_with_tax, 16.0);

    assert_eq!(
        backend.calls()[1..],
        ["PUT /orders/1", "DELETE /orders/2", "DELETE /orders/3"]
    );
    let board = service.board();
    let board = board.read().await;
    assert_eq!(board.len(), 1);
    assert_eq!(board.get(1).unwrap().unit_count(), 4);
}

#[tokio::test]
async fn test_split_creates_destination_and_updates_source() {
    let source = order(
        7,
        2,
        OrderStatus::InProgress,
        vec![line(70, 5, 3, 2.0), line(71, 6, 1, 9.0)],
    );
    let backend = MemoryBackend::with_orders(vec![source.clone()]);
    let (service, _) = service(&backend);

    let mut split = SplitSession::new(source).unwrap();
    split.move_to_destination(0, MoveAmount::One).unwrap();
    split.move_to_destination(1, MoveAmount::All).unwrap();
    let result = service.split(split).await.unwrap();

    assert_eq!(result.destination.id, 8);
    assert_eq!(result.destination.table_id, Some(2));
    assert_eq!(result.destination.total_with_tax, 11.0);
    let source = result.source.unwrap();
    assert_eq!(source.items.len(), 1);
    assert_eq!(source.items[0].quantity, 2);
    assert_eq!(backend.calls(), ["POST /orders", "PUT /orders/7"]);
}

#[tokio::test]
async fn test_split_moving_everything_deletes_source() {
    let source = order(7, 2, OrderStatus::Pending, vec![line(70, 5, 2, 2.0)]);
    let backend = MemoryBackend::with_orders(vec![source.clone()]);
    let (service, _) = service(&backend);
    service.refresh_board().await.unwrap();

    let mut split = SplitSession::new(source).unwrap();
    split.move_to_destination(0, MoveAmount::All).unwrap();
    let result = service.split(split).await.unwrap();

    assert!(result.source.is_none());
    assert!(backend.order(7).is_none());
    let board = service.board();
    let board = board.read().await;
    assert!(board.get(7).is_none());
    assert!(board.get(result.destination.id).is_some());
}

#[tokio::test]
async fn test_floor_map_round_trip() {
    let backend = MemoryBackend::default();
    let (service, notifier) = service(&backend);

    let mut editor = service.load_map().await.unwrap();
    let id = editor
        .add_table(Table {
            id: 5,
            number: 5,
            capacity: 6,
            location: None,
        })
        .unwrap();
    editor.set_shape(id, TableShape::Circle).unwrap();
    editor.set_width(id, 90.0).unwrap();

    let saved = service.save_map(&mut editor).await.unwrap();
    assert_eq!(saved.entries[0].id, 1000);
    assert_eq!(saved.entries[0].height, 90.0);
    assert!(!editor.is_dirty());

    // nothing changed, nothing sent
    service.save_map(&mut editor).await.unwrap();
    assert_eq!(backend.calls(), ["GET /map", "POST /map"]);
    assert_eq!(notifier.last().level, NotificationLevel::Info);
}

#[tokio::test]
async fn test_backend_errors_reach_the_notifier() {
    let backend = MemoryBackend::default();
    let (service, notifier) = service(&backend);

    let ghost = order(99, 1, OrderStatus::Pending, vec![line(1, 5, 1, 1.0)]);
    let mut editor = OrderEditor::new(ghost).unwrap();
    editor.increment(0).unwrap();
    let err = service.save_order(editor).await.unwrap_err();

    assert!(matches!(err, PosError::Client(ClientError::NotFound(_))));
    let last = notifier.last();
    assert_eq!(last.level, NotificationLevel::Error);
    assert_eq!(last.title, "Could not save order");
}
