use lunex_http::{LunexClient, Query};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url =
        std::env::var("LUNEX_BASE_URL").unwrap_or_else(|_| "https://api.example.com".to_owned());
    let client = LunexClient::new(base_url)?;

    let users = client
        .get("users", Query::new().push("limit", 5).push("active", true))
        .await?;
    println!("users with query: {users:?}");

    Ok(())
}
