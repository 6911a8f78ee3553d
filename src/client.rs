use std::fmt;

use reqwest::Url;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::ClientConfig,
    decode::{decode_body, decode_image, decode_stats, encode_asset, expect_success},
    retry::resilient_call,
    transport::{HttpTransport, Request, Transport},
    wire, Analysis, Asset, BucketItem, ClientOptions, DownloadedAsset, NewUser, PhotoAppError,
    Result, SearchHit, Stats, User, UserUpsert,
};

/// Client for the PhotoApp web service.
///
/// Every call goes through [`resilient_call`], so transient statuses are
/// retried and 400/500 answers come back as [`PhotoAppError::Api`].
#[derive(Clone)]
pub struct PhotoAppClient<T = HttpTransport> {
    transport: T,
    base_url: Url,
    options: ClientOptions,
}

impl<T> fmt::Debug for PhotoAppClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoAppClient")
            .field("base_url", &self.base_url.as_str())
            .field("options", &self.options)
            .finish()
    }
}

impl PhotoAppClient<HttpTransport> {
    /// Creates a client with default options (3 attempts, 1 s backoff unit).
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(base_url, ClientOptions::default())
    }

    /// Creates a client with explicit timeout and retry settings.
    pub fn with_options(base_url: &str, options: ClientOptions) -> Result<Self> {
        let transport = HttpTransport::new(options.timeout());
        Self::with_transport(base_url, transport, options)
    }

    /// Creates a client from a validated configuration file.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::with_options(&config.client.webservice, config.client_options())
    }
}

impl<T: Transport> PhotoAppClient<T> {
    /// Creates a client over any [`Transport`].
    pub fn with_transport(base_url: &str, transport: T, options: ClientOptions) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| PhotoAppError::InvalidUrl(format!("'{base_url}': {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(PhotoAppError::InvalidUrl(format!(
                "'{base_url}' cannot be used as a base url"
            )));
        }
        Ok(Self {
            transport,
            base_url,
            options,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `GET /stats`
    pub async fn stats(&self) -> Result<Stats> {
        let body: wire::StatsBody = self.get(&["stats"]).await?;
        Ok(decode_stats(body))
    }

    /// `GET /users`
    pub async fn users(&self) -> Result<Vec<User>> {
        let body: wire::UsersBody = self.get(&["users"]).await?;
        Ok(body.data)
    }

    /// `GET /assets`
    pub async fn assets(&self) -> Result<Vec<Asset>> {
        let body: wire::AssetsBody = self.get(&["assets"]).await?;
        Ok(body.data)
    }

    /// `GET /image/{asset_id}`; the payload is returned decoded.
    pub async fn download(&self, asset_id: i64) -> Result<DownloadedAsset> {
        let body: wire::ImageBody = self.get(&["image", &asset_id.to_string()]).await?;
        decode_image(body)
    }

    /// `GET /bucket[?startafter=KEY]`: one page of bucket objects.
    pub async fn bucket_page(&self, start_after: Option<&str>) -> Result<Vec<BucketItem>> {
        let url = self.bucket_url(start_after)?;
        let body: wire::BucketBody = self.fetch(Request::get(url)).await?;
        Ok(body.data)
    }

    /// URL of the bucket page that follows `start_after`.
    pub fn bucket_url(&self, start_after: Option<&str>) -> Result<String> {
        let mut url = self.endpoint_url(&["bucket"])?;
        if let Some(key) = start_after {
            url.query_pairs_mut().append_pair("startafter", key);
        }
        Ok(url.into())
    }

    /// `POST /image/{user_id}`: uploads `bytes` as a new asset and returns
    /// its id.
    pub async fn upload(&self, user_id: i64, asset_name: &str, bytes: &[u8]) -> Result<i64> {
        let url = self.endpoint(&["image", &user_id.to_string()])?;
        let payload = encode_json(&wire::UploadRequest {
            assetname: asset_name,
            data: encode_asset(bytes),
        })?;
        let body: wire::UploadBody = self.fetch(Request::post(url, payload)).await?;
        Ok(body.asset_id)
    }

    /// `PUT /user`: inserts the user, or updates it when the email exists.
    pub async fn put_user(&self, user: &NewUser) -> Result<UserUpsert> {
        let url = self.endpoint(&["user"])?;
        let payload = encode_json(&wire::UserRequest {
            email: &user.email,
            lastname: &user.lastname,
            firstname: &user.firstname,
            bucketfolder: &user.bucketfolder,
        })?;
        let body: wire::UserBody = self.fetch(Request::put(url, payload)).await?;
        Ok(UserUpsert {
            message: body.message,
            user_id: body.user_id,
        })
    }

    /// `GET /labels/{asset_id}`: runs (or recalls) label detection.
    pub async fn labels(&self, asset_id: i64) -> Result<Analysis> {
        let body: wire::LabelsBody = self.get(&["labels", &asset_id.to_string()]).await?;
        Ok(Analysis {
            asset_name: body.asset_name,
            labels: body.data,
        })
    }

    /// `GET /images/{label}`: assets tagged with `label`.
    pub async fn search(&self, label: &str) -> Result<Vec<SearchHit>> {
        let body: wire::SearchBody = self.get(&["images", label]).await?;
        Ok(body.data)
    }

    async fn get<B: DeserializeOwned>(&self, segments: &[&str]) -> Result<B> {
        let url = self.endpoint(segments)?;
        self.fetch(Request::get(url)).await
    }

    async fn fetch<B: DeserializeOwned>(&self, request: Request) -> Result<B> {
        let outcome = resilient_call(&self.transport, &self.options, &request).await?;
        let response = expect_success(outcome, &request.url)?;
        decode_body(&response, &request.url)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<String> {
        self.endpoint_url(segments).map(String::from)
    }

    fn endpoint_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PhotoAppError::InvalidUrl(format!("'{}' cannot be a base", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn encode_json<S: Serialize>(value: &S) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|err| PhotoAppError::Decode(format!("could not encode request body: {err}")))
}
