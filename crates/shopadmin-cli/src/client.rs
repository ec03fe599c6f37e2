use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use shopadmin_core::{
    Category, EntityId, Order, OrderStatus, PageRequest, Paginated, Product, User, Version,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the shop backend.
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .with_context(|| format!("Invalid server URL: {base_url}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("Invalid server URL: {base_url}");
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { http, base })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Server URL cannot take a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, method: reqwest::Method, url: Url, req: RequestParts<'_>) -> Result<Value> {
        tracing::debug!(%method, %url, "sending request");
        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .header("Accept", "application/json");
        if !req.query.is_empty() {
            builder = builder.query(req.query);
        }
        if let Some(body) = req.body {
            builder = builder.json(body);
        }
        let resp = builder
            .send()
            .await
            .context("Failed to connect to server")?;
        handle_response(resp).await.inspect_err(|e| {
            tracing::warn!(%method, %url, error = %e, "request failed");
        })
    }

    async fn get(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Value> {
        let url = self.endpoint(segments)?;
        self.send(reqwest::Method::GET, url, RequestParts { query, body: None })
            .await
    }

    async fn post(&self, segments: &[&str], query: &[(&str, String)], body: &Value) -> Result<Value> {
        let url = self.endpoint(segments)?;
        self.send(
            reqwest::Method::POST,
            url,
            RequestParts {
                query,
                body: Some(body),
            },
        )
        .await
    }

    async fn put(&self, segments: &[&str], body: &Value) -> Result<Value> {
        let url = self.endpoint(segments)?;
        self.send(
            reqwest::Method::PUT,
            url,
            RequestParts {
                query: &[],
                body: Some(body),
            },
        )
        .await
    }

    async fn delete(&self, segments: &[&str]) -> Result<Value> {
        let url = self.endpoint(segments)?;
        self.send(reqwest::Method::DELETE, url, RequestParts::default())
            .await
    }

    // Orders

    pub async fn list_orders(&self, page: PageRequest) -> Result<Paginated<Order>> {
        let value = self
            .get(&["order", "get-all-orders", ""], &page_query(page))
            .await?;
        parse_page(value, "orders", page)
    }

    pub async fn update_order_status(&self, id: EntityId, status: &OrderStatus) -> Result<Value> {
        self.put(
            &["order", "update-status", &id.to_string()],
            &json!({ "status": status }),
        )
        .await
    }

    pub async fn total_revenue(&self) -> Result<Value> {
        self.get(&["order", "get-total-revenue"], &[]).await
    }

    /// Orders have no read-by-id endpoint; page through the list instead.
    pub async fn find_order(&self, id: EntityId, page_size: u32) -> Result<Option<Order>> {
        let mut page = PageRequest::first(page_size);
        loop {
            let orders = self.list_orders(page).await?;
            if let Some(order) = orders.items.iter().find(|o| o.id == id) {
                return Ok(Some(order.clone()));
            }
            if !orders.has_next() || orders.is_empty() {
                return Ok(None);
            }
            page = page.next();
        }
    }

    // Users

    pub async fn list_users(&self, page: PageRequest) -> Result<Paginated<User>> {
        let value = self
            .get(&["user", "get-all-users", ""], &page_query(page))
            .await?;
        parse_page(value, "users", page)
    }

    pub async fn delete_user(&self, id: EntityId) -> Result<Value> {
        self.delete(&["user", "delete-user", &id.to_string()]).await
    }

    pub async fn total_users(&self) -> Result<Value> {
        self.get(&["user", "get-total-users"], &[]).await
    }

    // Products

    pub async fn list_products(&self, page: PageRequest, search: &str) -> Result<Paginated<Product>> {
        let mut query = page_query(page);
        query.push(("search", search.to_string()));
        let value = self.get(&["product", "get", ""], &query).await?;
        parse_page(value, "products", page)
    }

    /// Products have no read-by-id endpoint; page through the list instead.
    pub async fn find_product(&self, id: EntityId, page_size: u32) -> Result<Option<Product>> {
        let mut page = PageRequest::first(page_size);
        loop {
            let products = self.list_products(page, "").await?;
            if let Some(product) = products.items.iter().find(|p| p.id == id) {
                return Ok(Some(product.clone()));
            }
            if !products.has_next() || products.is_empty() {
                return Ok(None);
            }
            page = page.next();
        }
    }

    pub async fn create_product(&self, product: &Value) -> Result<Value> {
        self.post(&["product", "create"], &[], product).await
    }

    pub async fn update_product(&self, id: EntityId, changes: &Value) -> Result<Value> {
        self.put(&["product", "update", &id.to_string()], changes)
            .await
    }

    pub async fn delete_product(&self, id: EntityId) -> Result<Value> {
        self.delete(&["product", "delete", &id.to_string()]).await
    }

    pub async fn total_stock(&self) -> Result<Value> {
        self.get(&["product", "get-total-stock"], &[]).await
    }

    // Versions

    pub async fn create_version(&self, product_id: EntityId, version: &Value) -> Result<Value> {
        self.post(
            &["version", "create"],
            &[("productId", product_id.to_string())],
            version,
        )
        .await
    }

    pub async fn update_version(&self, id: EntityId, changes: &Value) -> Result<Value> {
        self.put(&["version", "update", &id.to_string()], changes)
            .await
    }

    pub async fn get_version(&self, id: EntityId) -> Result<Version> {
        let value = self.get(&["version", "get", &id.to_string()], &[]).await?;
        parse(value, "version")
    }

    /// The list arrives under a `versions` key.
    pub async fn versions_of_product(&self, product_id: EntityId) -> Result<Vec<Version>> {
        let value = self
            .get(
                &["version", "get-all-version-of-product"],
                &[("productId", product_id.to_string())],
            )
            .await?;
        match value.get("versions") {
            Some(list) => parse(list.clone(), "version list"),
            None if value.is_null() => Ok(Vec::new()),
            None => parse(value, "version list"),
        }
    }

    pub async fn delete_version(&self, id: EntityId) -> Result<Value> {
        self.delete(&["version", "delete", &id.to_string()]).await
    }

    // Sizes

    pub async fn create_size(&self, size: &Value) -> Result<Value> {
        self.post(&["size", "create"], &[], size).await
    }

    pub async fn update_size(&self, id: EntityId, size: &Value) -> Result<Value> {
        self.put(&["size", "update", &id.to_string()], size).await
    }

    pub async fn list_sizes(&self) -> Result<Value> {
        self.get(&["size", "get-all"], &[]).await
    }

    // Categories

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let value = self.get(&["category", "get-all"], &[]).await?;
        parse(value, "category list")
    }

    pub async fn create_category(&self, category: &Category) -> Result<Category> {
        let body = serde_json::to_value(category)?;
        let value = self.post(&["category", "create"], &[], &body).await?;
        parse(value, "category")
    }

    pub async fn update_category(&self, name: &str, changes: &Value) -> Result<Value> {
        self.put(&["category", "update", name], changes).await
    }

    pub async fn delete_category(&self, name: &str) -> Result<Value> {
        self.delete(&["category", "delete", name]).await
    }

    pub async fn products_of_category(
        &self,
        name: &str,
        page: PageRequest,
    ) -> Result<Paginated<Product>> {
        let mut query = vec![("categoryName", name.to_string())];
        query.extend(page_query(page));
        let value = self
            .get(&["category", "get-product-of-category"], &query)
            .await?;
        parse_page(value, "products", page)
    }
}

#[derive(Default)]
struct RequestParts<'a> {
    query: &'a [(&'a str, String)],
    body: Option<&'a Value>,
}

fn page_query(page: PageRequest) -> Vec<(&'static str, String)> {
    vec![
        ("page", page.page.to_string()),
        ("limit", page.limit.to_string()),
    ]
}

fn parse<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value).with_context(|| format!("Unexpected {what} payload"))
}

/// List payloads carry the items under a resource-specific key. Orders report
/// `totalPage`, everything else `totalPages`.
pub fn parse_page<T: DeserializeOwned>(
    value: Value,
    list_key: &str,
    requested: PageRequest,
) -> Result<Paginated<T>> {
    let items = match value.get(list_key) {
        Some(list) => parse(list.clone(), list_key)?,
        None => Vec::new(),
    };
    let total_pages = value
        .get("totalPages")
        .or_else(|| value.get("totalPage"))
        .and_then(as_page_number)
        .unwrap_or(1);
    let current_page = value
        .get("currentPage")
        .and_then(as_page_number)
        .unwrap_or(requested.page);
    Ok(Paginated {
        items,
        total_pages,
        current_page,
    })
}

fn as_page_number(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

/// The backend wraps most payloads as `{"data": ...}`. A present, truthy
/// `data` field is the payload; otherwise the whole body is.
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) if is_truthy(&data) => data,
            Some(data) => {
                map.insert("data".to_string(), data);
                Value::Object(map)
            }
            None => Value::Object(map),
        },
        other => other,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        if let Ok(json) = serde_json::from_str::<Value>(&body)
            && let Some(msg) = json
                .get("message")
                .or_else(|| json.get("error"))
                .and_then(|v| v.as_str())
        {
            anyhow::bail!("HTTP {status}: {msg}");
        }
        anyhow::bail!("HTTP {status}: {body}");
    }

    if body.is_empty() {
        return Ok(Value::Null);
    }

    let value: Value = serde_json::from_str(&body).context("Failed to parse response JSON")?;
    Ok(unwrap_envelope(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_with_data_is_unwrapped() {
        let body = json!({"data": {"products": []}, "message": "ok"});
        assert_eq!(unwrap_envelope(body), json!({"products": []}));
    }

    #[test]
    fn falsy_data_keeps_the_body() {
        let body = json!({"data": null, "message": "deleted"});
        assert_eq!(unwrap_envelope(body.clone()), body);

        let body = json!({"data": 0});
        assert_eq!(unwrap_envelope(body.clone()), body);

        assert_eq!(unwrap_envelope(json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn page_parsing_accepts_both_total_spellings() {
        let products: Paginated<Product> = parse_page(
            json!({"products": [{"id": 1, "name": "Tee"}], "totalPages": 3, "currentPage": 2}),
            "products",
            PageRequest::new(2, 8),
        )
        .unwrap();
        assert_eq!(products.items.len(), 1);
        assert_eq!(products.total_pages, 3);

        let orders: Paginated<Order> =
            parse_page(json!({"orders": [], "totalPage": 4}), "orders", PageRequest::new(3, 4))
                .unwrap();
        assert_eq!(orders.total_pages, 4);
        assert_eq!(orders.current_page, 3);
    }

    #[test]
    fn out_of_range_page_numbers_fall_back() {
        let products: Paginated<Product> = parse_page(
            json!({"products": [], "totalPages": 4_294_967_296u64, "currentPage": -2}),
            "products",
            PageRequest::new(2, 8),
        )
        .unwrap();
        assert_eq!(products.total_pages, 1);
        assert_eq!(products.current_page, 2);
    }

    #[test]
    fn endpoint_encodes_path_segments() {
        let client = ApiClient::new("http://localhost:5000/api/", DEFAULT_TIMEOUT).unwrap();
        let url = client.endpoint(&["category", "delete", "summer sale"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/category/delete/summer%20sale"
        );

        let url = client.endpoint(&["product", "get", ""]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/product/get/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(ApiClient::new("not a url", DEFAULT_TIMEOUT).is_err());
        assert!(ApiClient::new("mailto:admin@example.com", DEFAULT_TIMEOUT).is_err());
    }
}
