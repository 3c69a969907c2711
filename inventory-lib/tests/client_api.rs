//! Request shapes of the inventory REST client against a local server.

mod common;

use inventory_lib::InventoryClient;
use inventory_lib::api::Credentials;
use inventory_lib::api::InventoryInput;
use inventory_lib::api::InventoryItemInput;
use inventory_lib::api::ItemImage;
use inventory_lib::auth::StaticTokenProvider;
use inventory_lib::error::ApiError;
use inventory_lib::error::AuthError;
use inventory_lib::error::Error;
use inventory_lib::retry::RetryConfig;
use serde_json::json;

use common::MockServer;

fn client(server: &MockServer) -> InventoryClient {
    InventoryClient::builder()
        .url(format!("{}/api/", server.base_url()))
        .token_provider(StaticTokenProvider::new("t0ken"))
        .retry_config(RetryConfig::no_retry())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_login_returns_user_and_token() {
    let server = MockServer::fixed(
        200,
        json!({ "user": { "id": 5, "email": "a@b.c", "role": "admin" }, "token": "jwt" }),
    )
    .await;
    let anonymous = InventoryClient::builder()
        .url(format!("{}/api", server.base_url()))
        .build()
        .unwrap();

    let login = anonymous.login(&Credentials::new("a@b.c", "pw")).await.unwrap();
    assert_eq!(login.token, "jwt");
    assert_eq!(login.user.id, 5);
    assert_eq!(login.user.extra["role"], json!("admin"));

    let request = server.last();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path(), "/api/auth/login");
    assert_eq!(request.json(), json!({ "email": "a@b.c", "password": "pw" }));
    assert_eq!(request.header("authorization"), None);
}

#[tokio::test]
async fn test_login_rejected() {
    let server = MockServer::fixed(401, json!({ "message": "Wrong password" })).await;
    let err = client(&server)
        .login(&Credentials::new("a@b.c", "nope"))
        .await
        .unwrap_err();
    match err {
        Error::Auth(AuthError::InvalidCredentials { message }) => assert_eq!(message, "Wrong password"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_register_accepts_created() {
    let server = MockServer::fixed(201, json!({ "message": "User created" })).await;
    let status = client(&server)
        .register(&Credentials::new("new@b.c", "pw"))
        .await
        .unwrap();
    assert_eq!(status.status_code, 201);
    assert_eq!(status.message, "User created");
    assert_eq!(server.last().path(), "/api/auth/register");
}

#[tokio::test]
async fn test_list_inventories() {
    let server = MockServer::fixed(
        200,
        json!({ "status_code": 200, "results": [{ "id": 1, "name": "Garage" }, { "id": 2, "name": "Shed", "description": "back yard" }] }),
    )
    .await;
    let inventories = client(&server).list_inventories(42).await.unwrap();

    assert_eq!(inventories.len(), 2);
    assert_eq!(inventories[1].description.as_deref(), Some("back yard"));
    let request = server.last();
    assert_eq!(request.path(), "/api/inventory/list");
    assert_eq!(request.header("authorization"), Some("Bearer t0ken"));
    assert_eq!(request.json(), json!({ "userId": 42 }));
}

#[tokio::test]
async fn test_get_inventory_uses_get() {
    let server = MockServer::fixed(200, json!({ "results": { "id": 9, "name": "Attic" } })).await;
    let inventory = client(&server).get_inventory(9).await.unwrap();
    assert_eq!(inventory.name, "Attic");
    let request = server.last();
    assert_eq!(request.method, "GET");
    assert_eq!(request.path(), "/api/inventory/9");
}

#[tokio::test]
async fn test_status_code_in_body_wins() {
    let server = MockServer::fixed(200, json!({ "status_code": "404", "message": "No inventory" })).await;
    let err = client(&server).get_inventory(1).await.unwrap_err();
    match err {
        Error::Api(ApiError::Http { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "No inventory");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_inventory_mutations() {
    let server = MockServer::fixed(201, json!({ "message": "ok" })).await;
    let client = client(&server);

    client
        .create_inventory(&InventoryInput::new("Garage").user_id(3))
        .await
        .unwrap();
    let request = server.last();
    assert_eq!((request.method.as_str(), request.path()), ("POST", "/api/inventory/add"));
    assert_eq!(request.json(), json!({ "name": "Garage", "description": null, "userId": 3 }));

    let err = client.update_inventory(&InventoryInput::new("Garage")).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));

    client
        .update_inventory(&InventoryInput::new("Garage").id(8).description("tools"))
        .await
        .unwrap();
    let request = server.last();
    assert_eq!((request.method.as_str(), request.path()), ("PUT", "/api/inventory/update"));
    assert_eq!(request.json(), json!({ "id": 8, "name": "Garage", "description": "tools" }));
}

#[tokio::test]
async fn test_delete_inventory_rejects_created_status() {
    let server = MockServer::fixed(201, json!({})).await;
    let err = client(&server).delete_inventory(4).await.unwrap_err();
    assert_eq!(err.status_code(), Some(201));
    let request = server.last();
    assert_eq!(request.path(), "/api/inventory/delete");
    assert_eq!(request.json(), json!({ "inventoryId": 4 }));
}

#[tokio::test]
async fn test_item_reads() {
    let item = json!({ "id": 3, "inventoryId": 1, "name": "Drill", "quantity": 2 });
    let server = MockServer::fixed(200, json!({ "results": [item.clone()] })).await;
    let items = client(&server).list_items(42, 1).await.unwrap();
    assert_eq!(items[0].name, "Drill");
    assert_eq!(server.last().json(), json!({ "userId": 42, "inventoryId": 1 }));

    let server = MockServer::fixed(200, json!({ "results": item })).await;
    let fetched = client(&server).get_item(3, 42).await.unwrap();
    assert_eq!(fetched.inventory_id, 1);
    let request = server.last();
    assert_eq!((request.method.as_str(), request.path()), ("POST", "/api/item-detail/3"));
    assert_eq!(request.json(), json!({ "userId": 42 }));
}

#[tokio::test]
async fn test_create_item_sends_multipart() {
    let server = MockServer::fixed(201, json!({ "message": "created" })).await;
    let input = InventoryItemInput::new(1, "Drill", 2).image(ItemImage::File {
        file_name: "drill.png".to_string(),
        bytes: b"PNGDATA".to_vec(),
    });
    let status = client(&server).create_item(&input).await.unwrap();
    assert_eq!(status.message, "created");

    let request = server.last();
    assert_eq!(request.path(), "/api/item/add");
    assert!(request.header("content-type").unwrap().starts_with("multipart/form-data"));
    let body = request.text();
    assert!(body.contains("name=\"inventoryId\""));
    assert!(body.contains("name=\"name\"\r\n\r\nDrill"));
    assert!(body.contains("filename=\"drill.png\""));
    assert!(body.contains("PNGDATA"));
    assert!(!body.contains("name=\"description\""));
}

#[tokio::test]
async fn test_item_update_and_delete() {
    let server = MockServer::fixed(200, json!({})).await;
    let client = client(&server);

    client
        .update_item(&InventoryItemInput::new(1, "Drill", 3).id(3))
        .await
        .unwrap();
    let request = server.last();
    assert_eq!((request.method.as_str(), request.path()), ("POST", "/api/item/update"));
    assert!(request.text().contains("name=\"id\"\r\n\r\n3"));

    let status = client.delete_item(3).await.unwrap();
    assert_eq!(status.status_code, 200);
    let request = server.last();
    assert_eq!((request.method.as_str(), request.path()), ("DELETE", "/api/item/delete/3"));
}

#[tokio::test]
async fn test_rate_limit_is_reported() {
    let server = MockServer::fixed(429, json!({})).await;
    let err = client(&server).list_inventories(1).await.unwrap_err();
    assert!(matches!(err, Error::RateLimit { .. }));
}
