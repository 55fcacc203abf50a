//! Backend seam used by the workflows

use async_trait::async_trait;
use bistro_client::{ClientResult, HttpClient};
use shared::models::{Invoice, Order, Product, TableMap};

/// The subset of the REST API the till workflows need
#[async_trait]
pub trait Backend: Send + Sync {
    /// Orders currently on the floor, with their lines
    async fn open_orders(&self) -> ClientResult<Vec<Order>>;

    async fn create_order(&self, order: &Order) -> ClientResult<Order>;

    async fn update_order(&self, order: &Order) -> ClientResult<Order>;

    async fn delete_order(&self, order_id: i64) -> ClientResult<()>;

    async fn create_invoice(&self, invoice: &Invoice) -> ClientResult<Invoice>;

    async fn products(&self) -> ClientResult<Vec<Product>>;

    async fn table_map(&self) -> ClientResult<TableMap>;

    async fn save_table_map(&self, map: &TableMap) -> ClientResult<TableMap>;
}

#[async_trait]
impl Backend for HttpClient {
    async fn open_orders(&self) -> ClientResult<Vec<Order>> {
        self.list_orders_full().await
    }

    async fn create_order(&self, order: &Order) -> ClientResult<Order> {
        HttpClient::create_order(self, order).await
    }

    async fn update_order(&self, order: &Order) -> ClientResult<Order> {
        HttpClient::update_order(self, order).await
    }

    async fn delete_order(&self, order_id: i64) -> ClientResult<()> {
        HttpClient::delete_order(self, order_id).await
    }

    async fn create_invoice(&self, invoice: &Invoice) -> ClientResult<Invoice> {
        HttpClient::create_invoice(self, invoice).await
    }

    async fn products(&self) -> ClientResult<Vec<Product>> {
        self.list_products().await
    }

    async fn table_map(&self) -> ClientResult<TableMap> {
        self.get_map().await
    }

    async fn save_table_map(&self, map: &TableMap) -> ClientResult<TableMap> {
        self.save_map(map).await
    }
}
