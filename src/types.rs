use serde::Deserialize;

/// Counts reported by `GET /stats`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stats {
    /// Bucket status message.
    pub message: String,
    pub num_users: i64,
    pub num_assets: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct User {
    pub userid: i64,
    pub email: String,
    pub lastname: String,
    pub firstname: String,
    pub bucketfolder: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub assetid: i64,
    pub userid: i64,
    pub assetname: String,
    pub bucketkey: String,
}

/// One object in the storage bucket. Field names follow the object
/// store's listing format.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketItem {
    pub key: String,
    #[serde(default)]
    pub last_modified: String,
    #[serde(default, rename = "ETag")]
    pub etag: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub storage_class: String,
}

/// Asset fetched by `GET /image/{assetid}` with its payload decoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadedAsset {
    pub user_id: i64,
    pub asset_name: String,
    pub bucket_key: String,
    pub bytes: Vec<u8>,
}

/// Fields sent by `PUT /user`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub lastname: String,
    pub firstname: String,
    pub bucketfolder: String,
}

/// Result of `PUT /user`; `message` is `inserted` or `updated`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserUpsert {
    pub message: String,
    pub user_id: i64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Label {
    pub name: String,
    /// Percentage, usually whole.
    pub confidence: f64,
}

/// Labels detected for one asset.
#[derive(Clone, Debug, PartialEq)]
pub struct Analysis {
    pub asset_name: String,
    pub labels: Vec<Label>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SearchHit {
    pub asset_id: i64,
    pub confidence: f64,
}
