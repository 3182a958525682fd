use serde_json::json;

use crate::helpers::spawn_app;

#[tokio::test]
async fn unknown_path() {
    let app = spawn_app().await;

    for path in ["/", "/api", "/api/team", "/api/newsletter/extra"] {
        let resp = app.request(reqwest::Method::GET, path).await;
        assert_eq!(resp.status().as_u16(), 404, "{path}");
        assert_eq!(
            resp.json::<serde_json::Value>().await.unwrap(),
            json!({ "error": "Not Found", "path": path }),
        );
    }
}
