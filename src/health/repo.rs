use bson::{doc, oid::ObjectId};
use mongodb::{
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Database,
};
use serde::{Deserialize, Serialize};

const COLLECTION: &str = "HealthCheck";

/// The single sentinel document proving read/write connectivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub event: String,
}

/// Upsert the sentinel. Repeated calls update the same document, never a
/// second one.
pub async fn upsert_sentinel(db: &Database) -> anyhow::Result<Option<HealthCheck>> {
    let options = FindOneAndUpdateOptions::builder()
        .upsert(true)
        .return_document(ReturnDocument::After)
        .build();
    let sentinel = db
        .collection::<HealthCheck>(COLLECTION)
        .find_one_and_update(
            doc! { "event": "check" },
            doc! { "$set": { "event": "check" } },
            options,
        )
        .await?;
    Ok(sentinel)
}
