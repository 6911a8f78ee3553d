//! Bounded retry around a single [`Transport`] call.
//!
//! A 200 is success and a 400 or 500 is a well-formed application error;
//! both end the call immediately. Any other status is treated as transient
//! and retried with a linear backoff until the attempt ceiling is reached.
//! Transport failures end the call at once and are not retried.

use tokio::time::sleep;

use crate::{
    transport::{RawResponse, Request, Transport},
    ClientOptions, PhotoAppError, Result,
};

/// Terminal classification of a status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Success,
    Rejected,
    Transient,
}

pub fn classify(status: u16) -> Classification {
    match status {
        200 => Classification::Success,
        400 | 500 => Classification::Rejected,
        _ => Classification::Transient,
    }
}

/// What a logical call ended with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Status 200.
    Success(RawResponse),
    /// Status 400 or 500; the body carries a `message`.
    Rejected(RawResponse),
    /// The last response after the attempt ceiling, unmodified.
    Exhausted { response: RawResponse, attempts: u32 },
}

impl Outcome {
    pub fn response(&self) -> &RawResponse {
        match self {
            Outcome::Success(response) | Outcome::Rejected(response) => response,
            Outcome::Exhausted { response, .. } => response,
        }
    }
}

/// Sends `request` at most `options.max_attempts` times.
pub async fn resilient_call<T: Transport>(
    transport: &T,
    options: &ClientOptions,
    request: &Request,
) -> Result<Outcome> {
    let mut retries = 0u32;
    loop {
        let response = match transport.send(request).await {
            Ok(response) => response,
            Err(source) => {
                tracing::error!(
                    method = %request.method,
                    url = %request.url,
                    error = %source,
                    "web service call failed"
                );
                return Err(PhotoAppError::Transport {
                    method: request.method,
                    url: request.url.clone(),
                    source,
                });
            }
        };

        match classify(response.status) {
            Classification::Success => return Ok(Outcome::Success(response)),
            Classification::Rejected => return Ok(Outcome::Rejected(response)),
            Classification::Transient => {
                retries += 1;
                if retries < options.max_attempts {
                    let delay = options.backoff_for(retries);
                    tracing::debug!(
                        method = %request.method,
                        url = %request.url,
                        status = response.status,
                        "retrying after {} ms",
                        delay.as_millis()
                    );
                    sleep(delay).await;
                    continue;
                }

                tracing::warn!(
                    method = %request.method,
                    url = %request.url,
                    status = response.status,
                    attempts = retries,
                    "giving up on web service call"
                );
                return Ok(Outcome::Exhausted {
                    response,
                    attempts: retries,
                });
            }
        }
    }
}
