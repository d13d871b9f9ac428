use std::time::Duration;

use lunex_http::{ClientOptions, LunexClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let base_url =
        std::env::var("LUNEX_BASE_URL").unwrap_or_else(|_| "https://api.example.com".to_owned());

    let options = ClientOptions::default()
        .timeout(Duration::from_secs(5))
        .max_retries(3)
        .delay_fn(|ms| async move {
            println!("[retry delay] waiting for {ms}ms...");
            tokio::time::sleep(Duration::from_millis(ms)).await;
        })
        .on_request_start(|method, url, descriptor| {
            println!("[request start] {method} {url} headers={:?}", descriptor.headers);
        })
        .on_request_end(|summary| {
            println!(
                "[request end] status: {} {} after {} attempt(s)",
                summary.status, summary.status_text, summary.attempts
            );
        })
        .on_request_error(|err| {
            eprintln!("[request error] {}: {err}", err.name());
        });

    let client = LunexClient::with_options(base_url, Vec::<(String, String)>::new(), options)?;

    match client.get("users/1", ()).await {
        Ok(user) => println!("user: {user:?}"),
        Err(err) => eprintln!("request failed: {err}"),
    }

    Ok(())
}
