use serde_json::json;

use crate::helpers::spawn_app;
use crate::helpers::spawn_app_without_mailchimp;

#[tokio::test]
async fn status_online() {
    let app = spawn_app().await;
    let resp = app.get_status().await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "SynkLab API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["newsletter"], "online");
    assert!(body["environment"].is_string());
}

#[tokio::test]
async fn status_offline() {
    let app = spawn_app_without_mailchimp().await;
    let resp = app.get_status().await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["newsletter"], "offline");
}

#[tokio::test]
async fn status_wrong_method() {
    let app = spawn_app().await;
    let resp = app.request(reqwest::Method::POST, "/api/status").await;

    assert_eq!(resp.status().as_u16(), 405);
    assert_eq!(
        resp.json::<serde_json::Value>().await.unwrap(),
        json!({ "error": "Method Not Allowed" })
    );
}
