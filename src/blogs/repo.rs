use anyhow::Context;
use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::{
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Database,
};
use serde::{Deserialize, Serialize};

use crate::users::repo::User;

const COLLECTION: &str = "blogs";

/// Blog record as stored in the `blogs` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: Option<String>,
    pub img: Option<String>,
    pub author: ObjectId,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

/// Blog with the author reference resolved through `$lookup`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogWithAuthor {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: Option<String>,
    pub img: Option<String>,
    pub author: User,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

/// Patch applied by an ownership-gated update; absent fields stay untouched.
#[derive(Debug, Default)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub img: Option<String>,
}

impl BlogPatch {
    /// `$set` document: the supplied fields plus a touched `updated_at`.
    fn set_document(&self) -> Document {
        let mut set = doc! { "updated_at": bson::DateTime::now() };
        if let Some(title) = &self.title {
            set.insert("title", title.as_str());
        }
        if let Some(content) = &self.content {
            set.insert("content", content.as_str());
        }
        if let Some(img) = &self.img {
            set.insert("img", img.as_str());
        }
        set
    }
}

/// Match condition shared by the gated update and delete: the id and the
/// caller-asserted author must both hold in one store operation.
fn ownership_filter(id: ObjectId, author: ObjectId) -> Document {
    doc! { "_id": id, "author": author }
}

/// Pipeline stages resolving `author` into the embedded user document.
fn author_lookup() -> [Document; 2] {
    [
        doc! { "$lookup": {
            "from": "users",
            "localField": "author",
            "foreignField": "_id",
            "as": "author",
        }},
        doc! { "$unwind": "$author" },
    ]
}

impl Blog {
    pub fn new(
        title: String,
        content: Option<String>,
        img: Option<String>,
        author: ObjectId,
    ) -> Self {
        let now = bson::DateTime::now();
        Self {
            id: ObjectId::new(),
            title,
            content,
            img,
            author,
            created_at: now,
            updated_at: now,
        }
    }

    pub async fn create(db: &Database, blog: &Blog) -> anyhow::Result<()> {
        db.collection::<Blog>(COLLECTION)
            .insert_one(blog, None)
            .await?;
        Ok(())
    }

    pub async fn find_all(db: &Database) -> anyhow::Result<Vec<BlogWithAuthor>> {
        let docs: Vec<Document> = db
            .collection::<Blog>(COLLECTION)
            .aggregate(author_lookup(), None)
            .await?
            .try_collect()
            .await?;
        docs.into_iter()
            .map(|d| bson::from_document(d).context("decode blog with author"))
            .collect()
    }

    pub async fn find_by_id(db: &Database, id: ObjectId) -> anyhow::Result<Option<BlogWithAuthor>> {
        let mut pipeline = vec![doc! { "$match": { "_id": id } }];
        pipeline.extend(author_lookup());
        let doc = db
            .collection::<Blog>(COLLECTION)
            .aggregate(pipeline, None)
            .await?
            .try_next()
            .await?;
        doc.map(|d| bson::from_document(d).context("decode blog with author"))
            .transpose()
    }

    /// Atomic find-and-update gated on the stored author. Returns the
    /// post-update document, or None when no blog matches both conditions.
    pub async fn update_one_matching(
        db: &Database,
        id: ObjectId,
        author: ObjectId,
        patch: &BlogPatch,
    ) -> anyhow::Result<Option<Blog>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        let updated = db
            .collection::<Blog>(COLLECTION)
            .find_one_and_update(
                ownership_filter(id, author),
                doc! { "$set": patch.set_document() },
                options,
            )
            .await?;
        Ok(updated)
    }

    /// Atomic find-and-delete gated on the stored author.
    pub async fn delete_one_matching(
        db: &Database,
        id: ObjectId,
        author: ObjectId,
    ) -> anyhow::Result<Option<Blog>> {
        let deleted = db
            .collection::<Blog>(COLLECTION)
            .find_one_and_delete(ownership_filter(id, author), None)
            .await?;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_filter_matches_on_id_and_author() {
        let id = ObjectId::new();
        let author = ObjectId::new();
        let filter = ownership_filter(id, author);
        assert_eq!(filter.get_object_id("_id").unwrap(), id);
        assert_eq!(filter.get_object_id("author").unwrap(), author);
        assert_eq!(filter.len(), 2);
    }

    #[test]
    fn patch_sets_only_supplied_fields() {
        let patch = BlogPatch {
            content: Some("updated string".into()),
            ..Default::default()
        };
        let set = patch.set_document();
        assert_eq!(set.get_str("content").unwrap(), "updated string");
        assert!(set.get("updated_at").is_some());
        assert!(set.get("title").is_none());
        assert!(set.get("img").is_none());
    }

    #[test]
    fn empty_patch_still_touches_updated_at() {
        let set = BlogPatch::default().set_document();
        assert_eq!(set.len(), 1);
        assert!(set.get("updated_at").is_some());
    }

    #[test]
    fn author_lookup_targets_users_collection() {
        let [lookup, unwind] = author_lookup();
        let stage = lookup.get_document("$lookup").unwrap();
        assert_eq!(stage.get_str("from").unwrap(), "users");
        assert_eq!(stage.get_str("foreignField").unwrap(), "_id");
        assert_eq!(unwind.get_str("$unwind").unwrap(), "$author");
    }
}
