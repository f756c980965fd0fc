use anyhow::Context;
use bson::{doc, oid::ObjectId};
use mongodb::{options::IndexOptions, Database, IndexModel};
use serde::{Deserialize, Serialize};

const COLLECTION: &str = "users";

/// User record as stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub password: String, // argon2 hash, never plaintext
    pub date: bson::DateTime,
}

impl User {
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: ObjectId::new(),
            username,
            email,
            password: password_hash,
            date: bson::DateTime::now(),
        }
    }

    /// Register the unique constraints on username and email. Runs once
    /// from startup wiring.
    pub async fn ensure_indexes(db: &Database) -> anyhow::Result<()> {
        let collection = db.collection::<User>(COLLECTION);
        for field in ["username", "email"] {
            let index = IndexModel::builder()
                .keys(doc! { field: 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();
            collection
                .create_index(index, None)
                .await
                .with_context(|| format!("create unique index on users.{field}"))?;
        }
        Ok(())
    }

    /// Insert a new user. A lost race against the unique indexes surfaces
    /// as a duplicate-key driver error.
    pub async fn create(db: &Database, user: &User) -> anyhow::Result<ObjectId> {
        db.collection::<User>(COLLECTION)
            .insert_one(user, None)
            .await?;
        Ok(user.id)
    }

    pub async fn find_by_username(db: &Database, username: &str) -> anyhow::Result<Option<User>> {
        let user = db
            .collection::<User>(COLLECTION)
            .find_one(doc! { "username": username }, None)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(db: &Database, email: &str) -> anyhow::Result<Option<User>> {
        let user = db
            .collection::<User>(COLLECTION)
            .find_one(doc! { "email": email }, None)
            .await?;
        Ok(user)
    }

    /// Single `$or` lookup backing the duplicate check on registration.
    pub async fn find_by_email_or_username(
        db: &Database,
        email: &str,
        username: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = db
            .collection::<User>(COLLECTION)
            .find_one(
                doc! { "$or": [ { "email": email }, { "username": username } ] },
                None,
            )
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &Database, id: ObjectId) -> anyhow::Result<Option<User>> {
        let user = db
            .collection::<User>(COLLECTION)
            .find_one(doc! { "_id": id }, None)
            .await?;
        Ok(user)
    }
}
