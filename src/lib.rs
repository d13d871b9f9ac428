//! `lunex-http` is an async HTTP request client bound to a base URL.
//!
//! Every call runs through the same pipeline:
//! - each attempt is bounded by [`ClientOptions::timeout`];
//! - connection failures and timeouts are retried up to
//!   [`ClientOptions::max_retries`] times, waiting on the configured delay
//!   function between attempts;
//! - non-2xx responses fail immediately with [`LunexError::Http`];
//! - optional start/end/error hooks observe each logical call.
//!
//! ```no_run
//! use lunex_http::{LunexClient, Query};
//!
//! # async fn run() -> lunex_http::Result<()> {
//! let client = LunexClient::new("https://api.example.com")?;
//! let users = client
//!     .get("users", Query::new().push("limit", 5).push("active", true))
//!     .await?;
//! println!("{users:?}");
//! # Ok(())
//! # }
//! ```

mod client;
mod decode;
mod error;
mod hooks;
mod options;
mod request;
mod retry;
mod transport;
mod types;
mod value;

pub use client::LunexClient;
pub use error::LunexError;
pub use options::{ClientOptions, DelayFn, DelayFuture, EndHook, ErrorHook, StartHook};
pub use request::{build_url, Body, Query, RequestDescriptor, RequestOptions};
pub use types::{Method, ResponseSummary};
pub use value::Value;

pub type Result<T> = std::result::Result<T, LunexError>;
