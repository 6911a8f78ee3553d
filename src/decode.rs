use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;

use crate::{
    retry::Outcome,
    transport::RawResponse,
    wire::{self, ErrorBody},
    DownloadedAsset, PhotoAppError, Result, Stats,
};

/// Turns a terminal outcome into the success body or a typed error.
pub(crate) fn expect_success(outcome: Outcome, url: &str) -> Result<RawResponse> {
    match outcome {
        Outcome::Success(response) => Ok(response),
        Outcome::Rejected(response) => Err(PhotoAppError::Api {
            status: response.status,
            url: url.to_owned(),
            message: rejection_message(&response.body),
        }),
        Outcome::Exhausted { response, attempts } => Err(PhotoAppError::Exhausted {
            status: response.status,
            url: url.to_owned(),
            attempts,
        }),
    }
}

/// Error text of a 400/500 body; falls back to the raw body.
pub(crate) fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.message)
        .unwrap_or_else(|_| body.trim().to_owned())
}

pub(crate) fn decode_body<T: DeserializeOwned>(response: &RawResponse, url: &str) -> Result<T> {
    serde_json::from_str::<T>(&response.body).map_err(|err| {
        PhotoAppError::Decode(format!(
            "invalid response JSON from {url}: {err}; body: {}",
            response.body
        ))
    })
}

pub(crate) fn decode_stats(body: wire::StatsBody) -> Stats {
    Stats {
        message: body.message,
        num_users: body.num_users,
        num_assets: body.num_assets,
    }
}

pub(crate) fn decode_image(body: wire::ImageBody) -> Result<DownloadedAsset> {
    let bytes = STANDARD.decode(body.data.trim()).map_err(|err| {
        PhotoAppError::Decode(format!(
            "invalid base64 payload for asset '{}': {err}",
            body.asset_name
        ))
    })?;

    Ok(DownloadedAsset {
        user_id: body.user_id,
        asset_name: body.asset_name,
        bucket_key: body.bucket_key,
        bytes,
    })
}

pub(crate) fn encode_asset(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
