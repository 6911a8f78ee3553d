//! `photoapp-client` talks to the PhotoApp web service over plain HTTP.
//!
//! The request layer is the interesting part:
//! - [`retry::resilient_call`] sends a request at most three times, treating
//!   200, 400 and 500 as final answers and backing off linearly otherwise.
//! - [`pagination::list_bucket`] walks the bucket listing twelve objects at a
//!   time with a `startafter` cursor.
//! - [`PhotoAppClient`] exposes one typed method per endpoint.
//!
//! The [`dispatch`] and [`console`] modules drive the interactive menu used
//! by the `photoapp` binary.

mod client;
mod decode;
mod error;
mod options;
mod types;
mod wire;

pub mod config;
pub mod console;
pub mod dispatch;
pub mod logging;
pub mod pagination;
pub mod retry;
pub mod transport;

pub use client::PhotoAppClient;
pub use error::PhotoAppError;
pub use options::ClientOptions;
pub use types::{
    Analysis, Asset, BucketItem, DownloadedAsset, Label, NewUser, SearchHit, Stats, User,
    UserUpsert,
};

pub type Result<T> = std::result::Result<T, PhotoAppError>;
