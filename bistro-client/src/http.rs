//! HTTP client for the backend REST API

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::error::{ApiResponse, AppError, ErrorCategory, ErrorCode};
use shared::models::{
    Invoice, InvoiceFilter, Order, OrderFilter, Product, ProductInput, TableMap, User, UserInput,
};

use crate::config::AssetUploadConfig;
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making requests to the backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    asset_upload: Option<AssetUploadConfig>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            asset_upload: config.asset_upload.clone(),
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(t) => request.bearer_auth(t),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(path, "GET");
        let response = self.authorize(self.client.get(self.url(path))).send().await?;
        Self::handle_response(response).await
    }

    /// Make a GET request returning the raw body text
    pub async fn get_text(&self, path: &str) -> ClientResult<String> {
        tracing::debug!(path, "GET (text)");
        let response = self.authorize(self.client.get(self.url(path))).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.text().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(path, "POST");
        let request = self.client.post(self.url(path)).json(body);
        let response = self.authorize(request).send().await?;
        Self::handle_response(response).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(path, "PUT");
        let request = self.client.put(self.url(path)).json(body);
        let response = self.authorize(request).send().await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request; any response body is discarded
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        tracing::debug!(path, "DELETE");
        let response = self
            .authorize(self.client.delete(self.url(path)))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!(
                "{e}: {}",
                String::from_utf8_lossy(&bytes[..bytes.len().min(200)])
            ))
        })
    }

    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let err = Self::status_error(status, &text);
        tracing::warn!(status = %status, error = %err, "Request failed");
        Err(err)
    }

    /// Map a failed status and its body to a [`ClientError`]
    pub(crate) fn status_error(status: StatusCode, body: &str) -> ClientError {
        let app_error = match serde_json::from_str::<ApiResponse<()>>(body) {
            Ok(envelope) => envelope.into_app_error(status),
            Err(_) => {
                let message = if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    body.trim().to_string()
                };
                AppError::with_message(ErrorCode::from_http_status(status), message)
            }
        };

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::FORBIDDEN => ClientError::Forbidden(app_error.message),
            StatusCode::NOT_FOUND => ClientError::NotFound(app_error.message),
            StatusCode::BAD_REQUEST if app_error.code.category() == ErrorCategory::General => {
                ClientError::Validation(app_error.message)
            }
            _ => ClientError::Api(app_error),
        }
    }

    // ========== Orders API ==========

    /// Open orders (summary)
    pub async fn list_orders(&self) -> ClientResult<Vec<Order>> {
        self.get("orders").await
    }

    /// Orders with every line item loaded
    pub async fn list_orders_full(&self) -> ClientResult<Vec<Order>> {
        self.get("orders/full").await
    }

    pub async fn filter_orders(&self, filter: &OrderFilter) -> ClientResult<Vec<Order>> {
        self.post("orders/filters", filter).await
    }

    pub async fn create_order(&self, order: &Order) -> ClientResult<Order> {
        self.post("orders", order).await
    }

    pub async fn update_order(&self, order: &Order) -> ClientResult<Order> {
        self.put(&format!("orders/{}", order.id), order).await
    }

    pub async fn delete_order(&self, order_id: i64) -> ClientResult<()> {
        self.delete(&format!("orders/{order_id}")).await
    }

    // ========== Invoice API ==========

    pub async fn create_invoice(&self, invoice: &Invoice) -> ClientResult<Invoice> {
        self.post("invoice", invoice).await
    }

    pub async fn list_invoices(&self) -> ClientResult<Vec<Invoice>> {
        self.get("invoice").await
    }

    pub async fn filter_invoices(&self, filter: &InvoiceFilter) -> ClientResult<Vec<Invoice>> {
        self.post("invoice/filters", filter).await
    }

    // ========== Products API ==========

    pub async fn list_products(&self) -> ClientResult<Vec<Product>> {
        self.get("products").await
    }

    pub async fn create_product(&self, input: &ProductInput) -> ClientResult<Product> {
        self.post("products", input).await
    }

    pub async fn update_product(&self, id: i64, input: &ProductInput) -> ClientResult<Product> {
        self.put(&format!("products/{id}"), input).await
    }

    pub async fn delete_product(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("products/{id}")).await
    }

    // ========== Floor map API ==========

    pub async fn get_map(&self) -> ClientResult<TableMap> {
        self.get("map").await
    }

    /// Replace the whole floor map (last writer wins)
    pub async fn save_map(&self, map: &TableMap) -> ClientResult<TableMap> {
        self.post("map", map).await
    }

    // ========== Users API ==========

    pub async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.get("users").await
    }

    pub async fn create_user(&self, input: &UserInput) -> ClientResult<User> {
        self.post("users", input).await
    }

    pub async fn update_user(&self, id: i64, input: &UserInput) -> ClientResult<User> {
        self.put(&format!("users/{id}"), input).await
    }

    pub async fn delete_user(&self, id: i64) -> ClientResult<()> {
        self.delete(&format!("users/{id}")).await
    }

    // ========== Printing API ==========

    /// Ask the backend to print an order ticket; returns the printable markup
    pub async fn print_order(&self, order_id: i64) -> ClientResult<String> {
        self.get_text(&format!("print/order/{order_id}")).await
    }

    /// Ask the backend to print an invoice receipt; returns the printable markup
    pub async fn print_invoice(&self, invoice_id: i64) -> ClientResult<String> {
        self.get_text(&format!("print/invoice/{invoice_id}")).await
    }

    // ========== Assets ==========

    /// Upload a product image to the asset host, returning its public URL
    pub async fn upload_asset(&self, file_name: &str, bytes: Vec<u8>) -> ClientResult<String> {
        #[derive(serde::Deserialize)]
        struct UploadResponse {
            secure_url: Option<String>,
            url: Option<String>,
        }

        let upload = self
            .asset_upload
            .as_ref()
            .ok_or_else(|| ClientError::Config("asset upload is not configured".to_string()))?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", upload.preset.clone());

        let response = self.client.post(&upload.url).multipart(form).send().await?;
        let body: UploadResponse = Self::handle_response(response).await.map_err(|e| {
            tracing::error!(file_name, error = %e, "Asset upload failed");
            match e {
                ClientError::Api(app) => {
                    ClientError::Api(AppError::with_message(ErrorCode::AssetUploadFailed, app.message))
                }
                other => other,
            }
        })?;

        body.secure_url
            .or(body.url)
            .ok_or_else(|| ClientError::InvalidResponse("upload response has no url".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = HttpClient::new(&ClientConfig::new("http://localhost:8080/api/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.url("orders"), "http://localhost:8080/api/orders");
        assert_eq!(client.url("/map"), "http://localhost:8080/api/map");
    }

    #[test]
    fn test_status_error_with_envelope() {
        let err = HttpClient::status_error(
            StatusCode::CONFLICT,
            r#"{"code":4002,"message":"Order 5 already paid"}"#,
        );
        match err {
            ClientError::Api(app) => {
                assert_eq!(app.code, ErrorCode::OrderAlreadyPaid);
                assert_eq!(app.message, "Order 5 already paid");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_status_error_plain_body() {
        assert!(matches!(
            HttpClient::status_error(StatusCode::UNAUTHORIZED, ""),
            ClientError::Unauthorized
        ));
        match HttpClient::status_error(StatusCode::NOT_FOUND, "no such order") {
            ClientError::NotFound(msg) => assert_eq!(msg, "no such order"),
            other => panic!("unexpected {other:?}"),
        }
        match HttpClient::status_error(StatusCode::BAD_REQUEST, "") {
            ClientError::Validation(msg) => assert_eq!(msg, "Bad Request"),
            other => panic!("unexpected {other:?}"),
        }
        match HttpClient::status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom") {
            ClientError::Api(app) => assert_eq!(app.code, ErrorCode::InternalError),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_business_rule_keeps_code() {
        let err = HttpClient::status_error(
            StatusCode::BAD_REQUEST,
            r#"{"code":5006,"message":"split mismatch"}"#,
        );
        match err {
            ClientError::Api(app) => assert_eq!(app.code, ErrorCode::PaymentSplitMismatch),
            other => panic!("unexpected {other:?}"),
        }
    }
}
