use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shopadmin_cli::client::{ApiClient, DEFAULT_TIMEOUT};
use shopadmin_core::{Category, OrderStatus, PageRequest};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&format!("{}/api", server.uri()), DEFAULT_TIMEOUT).unwrap()
}

#[tokio::test]
async fn test_version_payload_is_unwrapped_from_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/version/get/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "data": {
                "id": 9,
                "productId": 2,
                "style": "Navy",
                "sold": 0,
                "stock": 3,
                "images": [],
                "sizes": [{"size": "M", "quantity": 3}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let version = client(&server).get_version(9).await.unwrap();
    assert_eq!(version.style, "Navy");
    assert_eq!(version.total_quantity(), 3);
}

#[tokio::test]
async fn test_server_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/product/delete/3"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "product has orders"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).delete_product(3).await.unwrap_err();
    let text = err.to_string();
    assert!(text.contains("409"), "{text}");
    assert!(text.contains("product has orders"), "{text}");
}

#[tokio::test]
async fn test_non_json_error_body_is_reported_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/size/get-all"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client(&server).list_sizes().await.unwrap_err();
    assert!(err.to_string().contains("Bad Gateway"));
}

#[tokio::test]
async fn test_find_product_pages_through_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/product/get/"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "products": [{"id": 1, "name": "Tee"}, {"id": 2, "name": "Polo"}],
                "totalPages": 2,
                "currentPage": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/product/get/"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "products": [{"id": 5, "name": "Hoodie", "category": ["Winter"]}],
                "totalPages": 2,
                "currentPage": 2
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let product = client.find_product(5, 2).await.unwrap().unwrap();
    assert_eq!(product.name, "Hoodie");
    assert_eq!(product.category, vec!["Winter".to_string()]);
}

#[tokio::test]
async fn test_find_product_returns_none_after_last_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/product/get/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"products": [{"id": 1, "name": "Tee"}], "totalPages": 1, "currentPage": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client(&server).find_product(77, 8).await.unwrap().is_none());
}

#[tokio::test]
async fn test_orders_accept_total_page_spelling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/order/get-all-orders/"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "orders": [{
                    "id": 12,
                    "userId": 4,
                    "userName": "Linh",
                    "status": "Pending",
                    "totalAmount": 450000.0,
                    "items": [{
                        "id": 1,
                        "orderId": 12,
                        "productVersionSizeId": 30,
                        "quantity": 2,
                        "price": 225000.0
                    }]
                }],
                "totalPage": 3
            }
        })))
        .mount(&server)
        .await;

    let orders = client(&server)
        .list_orders(PageRequest::new(1, 4))
        .await
        .unwrap();
    assert_eq!(orders.total_pages, 3);
    assert!(orders.has_next());
    assert_eq!(orders.items[0].status, OrderStatus::Pending);
    assert_eq!(orders.items[0].items_total(), 450000.0);
}

#[tokio::test]
async fn test_category_names_are_path_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/category/update/Summer%20Sale"))
        .and(body_json(json!({"name": "Summer"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "updated"})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .update_category("Summer Sale", &json!({"name": "Summer"}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_category_posts_name_and_image() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/category/create"))
        .and(body_json(json!({"name": "Shoes", "image": "/img/shoes.png"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"name": "Shoes", "image": "/img/shoes.png"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server)
        .create_category(&Category::new("Shoes").with_image("/img/shoes.png"))
        .await
        .unwrap();
    assert_eq!(created.name, "Shoes");
}

#[tokio::test]
async fn test_create_version_sends_product_id_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/version/create"))
        .and(query_param("productId", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 40}})))
        .expect(1)
        .mount(&server)
        .await;

    let created = client(&server)
        .create_version(2, &json!({"style": "Red", "sizes": []}))
        .await
        .unwrap();
    assert_eq!(created, json!({"id": 40}));
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/user/delete-user/8"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let reply = client(&server).delete_user(8).await.unwrap();
    assert!(reply.is_null());
}

#[tokio::test]
async fn test_versions_of_product_read_from_versions_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/version/get-all-version-of-product"))
        .and(query_param("productId", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "versions": [
                    {
                        "id": 9,
                        "productId": 2,
                        "style": "Navy",
                        "stock": 5,
                        "images": ["/img/navy.png"],
                        "sizes": [{"size": "M", "quantity": 5}]
                    },
                    {"id": 10, "productId": 2, "style": "Sand", "sizes": []}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let versions = client(&server).versions_of_product(2).await.unwrap();
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0].style, "Navy");
    assert_eq!(versions[0].total_quantity(), 5);
    assert_eq!(versions[1].style, "Sand");
}

#[tokio::test]
async fn test_products_of_category_are_paged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/category/get-product-of-category"))
        .and(query_param("categoryName", "Summer Sale"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "products": [{"id": 6, "name": "Linen Shorts", "category": ["Summer Sale"]}],
                "totalPages": 3
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let products = client(&server)
        .products_of_category("Summer Sale", PageRequest::new(2, 5))
        .await
        .unwrap();
    assert_eq!(products.items[0].name, "Linen Shorts");
    assert_eq!(products.total_pages, 3);
    assert_eq!(products.current_page, 2);
    assert!(products.has_next());
}
