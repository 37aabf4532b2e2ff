mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::TestServer::start().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::TestServer::start().await?;

    let body = server
        .client
        .get(server.url("/"))
        .send()
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert!(body["data"]["endpoints"]["groups"].is_string(), "missing groups endpoint: {}", body);
    Ok(())
}

#[tokio::test]
async fn lookup_lists_are_public() -> Result<()> {
    let server = common::TestServer::start().await?;

    for (path, expected) in [("/members", 3), ("/programs", 2), ("/locations", 2)] {
        let res = server.client.get(server.url(path)).send().await?;
        assert_eq!(res.status(), StatusCode::OK, "{} returned {}", path, res.status());

        let body = res.json::<serde_json::Value>().await?;
        let rows = body["data"].as_array().expect("data should be an array");
        assert_eq!(rows.len(), expected, "{}: {}", path, body);
    }
    Ok(())
}
