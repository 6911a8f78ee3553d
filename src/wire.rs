use serde::{Deserialize, Serialize};

use crate::{Asset, BucketItem, Label, SearchHit, User};

#[derive(Debug, Serialize)]
pub struct UploadRequest<'a> {
    pub assetname: &'a str,
    pub data: String,
}

#[derive(Debug, Serialize)]
pub struct UserRequest<'a> {
    pub email: &'a str,
    pub lastname: &'a str,
    pub firstname: &'a str,
    pub bucketfolder: &'a str,
}

/// Body of every 400/500 response.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct StatsBody {
    pub message: String,
    #[serde(rename = "db_numUsers")]
    pub num_users: i64,
    #[serde(rename = "db_numAssets")]
    pub num_assets: i64,
}

#[derive(Debug, Deserialize)]
pub struct UsersBody {
    pub data: Vec<User>,
}

#[derive(Debug, Deserialize)]
pub struct AssetsBody {
    pub data: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
pub struct ImageBody {
    pub user_id: i64,
    pub asset_name: String,
    pub bucket_key: String,
    /// Base64-encoded asset bytes.
    pub data: String,
}

/// The service spells the message key inconsistently on this endpoint, so
/// only `data` is required.
#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct BucketBody {
    #[serde(default)]
    pub message: Option<String>,
    pub data: Vec<BucketItem>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
pub struct UploadBody {
    pub message: String,
    pub asset_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UserBody {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LabelsBody {
    pub asset_name: String,
    pub data: Vec<Label>,
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    pub data: Vec<SearchHit>,
}
