mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let (status, body) = common::get_json("/health", None).await?;

    // OK with a database, SERVICE_UNAVAILABLE without one
    assert!(
        status == StatusCode::OK || status == StatusCode::SERVICE_UNAVAILABLE,
        "unexpected status: {}",
        status
    );
    assert!(body["data"]["status"].is_string());
    Ok(())
}

#[tokio::test]
async fn root_describes_the_service() -> Result<()> {
    let (status, body) = common::get_json("/", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "school-admin-api");
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}
