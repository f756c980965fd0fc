use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::blogs::repo::{Blog, BlogWithAuthor};
use crate::users::dto::PublicUser;

/// Request body for blog creation.
#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: Option<String>,
    pub img: Option<String>,
    #[serde(rename = "authorId")]
    pub author_id: String,
}

/// Request body for an ownership-gated update.
#[derive(Debug, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub img: Option<String>,
    #[serde(default)]
    pub author: String,
}

/// Request body for an ownership-gated delete.
#[derive(Debug, Deserialize)]
pub struct DeleteBlogRequest {
    #[serde(default)]
    pub author: String,
}

/// Blog as returned from create/update: the author is still an id string.
#[derive(Debug, Serialize)]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub img: Option<String>,
    pub author: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Blog> for BlogResponse {
    fn from(blog: Blog) -> Self {
        Self {
            id: blog.id.to_hex(),
            title: blog.title,
            content: blog.content,
            img: blog.img,
            author: blog.author.to_hex(),
            created_at: blog.created_at.to_time_0_3(),
            updated_at: blog.updated_at.to_time_0_3(),
        }
    }
}

/// Blog with the author expanded to the public profile.
#[derive(Debug, Serialize)]
pub struct BlogDetails {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub img: Option<String>,
    pub author: PublicUser,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<BlogWithAuthor> for BlogDetails {
    fn from(blog: BlogWithAuthor) -> Self {
        Self {
            id: blog.id.to_hex(),
            title: blog.title,
            content: blog.content,
            img: blog.img,
            author: blog.author.into(),
            created_at: blog.created_at.to_time_0_3(),
            updated_at: blog.updated_at.to_time_0_3(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo::User;
    use bson::oid::ObjectId;

    #[test]
    fn create_request_reads_camel_case_author_id() {
        let payload: CreateBlogRequest = serde_json::from_value(serde_json::json!({
            "title": "testBlog1",
            "content": "Lorem ipsum",
            "authorId": "111111111111111111111111",
        }))
        .unwrap();
        assert_eq!(payload.author_id, "111111111111111111111111");
        assert!(payload.img.is_none());
    }

    #[test]
    fn blog_response_keeps_author_as_hex_id() {
        let author = ObjectId::new();
        let blog = Blog::new("testBlog1".into(), Some("Lorem ipsum".into()), None, author);
        let value = serde_json::to_value(BlogResponse::from(blog)).unwrap();
        assert_eq!(value["author"], author.to_hex());
        assert_eq!(value["title"], "testBlog1");
        assert_eq!(value["id"].as_str().unwrap().len(), 24);
    }

    #[test]
    fn blog_details_expands_author_without_private_fields() {
        let user = User::new("blogUser".into(), "test@email.com".into(), "hash".into());
        let user_id = user.id;
        let blog = Blog::new("testBlog2".into(), None, None, user_id);
        let expanded = BlogWithAuthor {
            id: blog.id,
            title: blog.title.clone(),
            content: blog.content.clone(),
            img: blog.img.clone(),
            author: user,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        };
        let value = serde_json::to_value(BlogDetails::from(expanded)).unwrap();
        assert_eq!(value["author"]["id"], user_id.to_hex());
        assert_eq!(value["author"]["username"], "blogUser");
        assert!(value["author"].get("email").is_none());
        assert!(value["author"].get("password").is_none());
    }
}
