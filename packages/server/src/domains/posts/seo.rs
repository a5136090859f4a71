//! Page metadata for a post detail page (title, description, social cards).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domains::posts::models::Post;

pub const OG_IMAGE_WIDTH: u32 = 1200;
pub const OG_IMAGE_HEIGHT: u32 = 630;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub images: Vec<OpenGraphImage>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub published_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenGraphImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub images: Vec<String>,
}

/// Empty strings count as unset
fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

impl PostMetadata {
    pub fn for_post(post: &Post) -> Self {
        let image = present(&post.og_image);
        let excerpt = present(&post.excerpt);

        Self {
            title: present(&post.meta_title).unwrap_or_else(|| post.title.clone()),
            description: present(&post.meta_description).or_else(|| excerpt.clone()),
            open_graph: OpenGraph {
                title: post.title.clone(),
                description: excerpt.clone(),
                images: image
                    .iter()
                    .map(|url| OpenGraphImage {
                        url: url.clone(),
                        width: OG_IMAGE_WIDTH,
                        height: OG_IMAGE_HEIGHT,
                    })
                    .collect(),
                kind: "article",
                published_time: post.created_at,
            },
            twitter: TwitterCard {
                card: "summary_large_image",
                title: post.title.clone(),
                description: excerpt,
                images: image.into_iter().collect(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PostId;

    fn post() -> Post {
        Post {
            id: PostId::new(),
            slug: "hello-world".to_string(),
            title: "Hello".to_string(),
            content: "0123456789".to_string(),
            excerpt: Some("A short intro".to_string()),
            published: true,
            view_count: 0,
            reading_time_minutes: Some(3),
            meta_title: None,
            meta_description: None,
            og_image: None,
            featured_image: None,
            featured_image_alt: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn falls_back_to_title_and_excerpt() {
        let meta = PostMetadata::for_post(&post());
        assert_eq!(meta.title, "Hello");
        assert_eq!(meta.description.as_deref(), Some("A short intro"));
        assert!(meta.open_graph.images.is_empty());
        assert!(meta.twitter.images.is_empty());
    }

    #[test]
    fn empty_seo_fields_fall_back_like_missing_ones() {
        let post = Post {
            meta_title: Some(String::new()),
            meta_description: Some(String::new()),
            og_image: Some(String::new()),
            ..post()
        };
        let meta = PostMetadata::for_post(&post);

        assert_eq!(meta.title, "Hello");
        assert_eq!(meta.description.as_deref(), Some("A short intro"));
        assert!(meta.open_graph.images.is_empty());
    }

    #[test]
    fn prefers_seo_fields_and_sizes_the_card_image() {
        let post = Post {
            meta_title: Some("Hello, SEO".to_string()),
            meta_description: Some("Search snippet".to_string()),
            og_image: Some("https://cdn.example.com/card.png".to_string()),
            ..post()
        };
        let meta = PostMetadata::for_post(&post);

        assert_eq!(meta.title, "Hello, SEO");
        assert_eq!(meta.description.as_deref(), Some("Search snippet"));
        assert_eq!(meta.open_graph.title, "Hello");
        assert_eq!(
            meta.open_graph.images,
            vec![OpenGraphImage {
                url: "https://cdn.example.com/card.png".to_string(),
                width: 1200,
                height: 630,
            }]
        );
        assert_eq!(meta.twitter.images, vec!["https://cdn.example.com/card.png"]);

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["open_graph"]["type"], "article");
        assert_eq!(json["twitter"]["card"], "summary_large_image");
    }
}
