//! Blog fixture shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, TimeZone, Utc};

use sarissa_sync::connection::RequestParams;
use sarissa_sync::document::{Document, FieldMapping, TypeMapping};
use sarissa_sync::error::Result;
use sarissa_sync::indexable::{Indexable, VecSource};

pub const DO_NOT_INDEX: &str = "DO-NOT-INDEX";

#[derive(Debug, Clone, PartialEq)]
pub struct Blog {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPost {
    pub id: i64,
    pub blog: Blog,
    pub title: String,
    pub slug: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

pub fn blog() -> Blog {
    Blog {
        id: 1,
        name: "test blog name".to_string(),
        description: "test blog description".to_string(),
    }
}

fn created_at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, minute, 0).unwrap()
}

/// One excluded post (id 1) followed by `count` indexable posts (ids 2..).
pub fn posts(count: usize) -> Vec<BlogPost> {
    let mut posts = vec![BlogPost {
        id: 1,
        blog: blog(),
        title: "DO-NOT-INDEX title".to_string(),
        slug: DO_NOT_INDEX.to_string(),
        body: "DO-NOT-INDEX body".to_string(),
        created_at: created_at(0),
    }];
    posts.extend(indexable_posts(count, 2));
    posts
}

/// `count` indexable posts with ids starting at `first_id`.
pub fn indexable_posts(count: usize, first_id: i64) -> Vec<BlogPost> {
    (0..count)
        .map(|i| {
            let n = i + 1;
            BlogPost {
                id: first_id + i as i64,
                blog: blog(),
                title: format!("blog post title {n}"),
                slug: format!("blog-post-title-{n}"),
                body: format!("blog post body {n}"),
                created_at: created_at((n % 60) as u32),
            }
        })
        .collect()
}

/// Record kind for blog posts, counting mapper and policy calls.
#[derive(Debug)]
pub struct BlogPostIndex {
    posts: Vec<BlogPost>,
    bulk_limit: usize,
    query_limit: usize,
    document_calls: AtomicUsize,
    should_index_calls: AtomicUsize,
}

impl BlogPostIndex {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self {
            posts,
            bulk_limit: 5,
            query_limit: 1000,
            document_calls: AtomicUsize::new(0),
            should_index_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_bulk_limit(mut self, limit: usize) -> Self {
        self.bulk_limit = limit;
        self
    }

    pub fn with_query_limit(mut self, limit: usize) -> Self {
        self.query_limit = limit;
        self
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn should_index_calls(&self) -> usize {
        self.should_index_calls.load(Ordering::SeqCst)
    }

    pub fn expected_document(post: &BlogPost) -> Document {
        let blog = Document::builder()
            .add_integer("id", post.blog.id)
            .add_text("name", post.blog.name.clone())
            .add_text("description", post.blog.description.clone())
            .build();
        Document::builder()
            .add_text("title", post.title.clone())
            .add_text("slug", post.slug.clone())
            .add_text("body", post.body.clone())
            .field("created_at", post.created_at)
            .add_object("blog", blog)
            .build()
    }
}

impl Indexable for BlogPostIndex {
    type Record = BlogPost;
    type Source = VecSource<BlogPost>;

    fn index_name(&self) -> &str {
        "blog"
    }

    fn type_name(&self) -> &str {
        "posts"
    }

    fn document_id(&self, post: &BlogPost) -> Result<String> {
        Ok(post.id.to_string())
    }

    fn document(&self, post: &BlogPost) -> Result<Document> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::expected_document(post))
    }

    fn records(&self) -> Result<VecSource<BlogPost>> {
        Ok(VecSource::new(self.posts.clone()))
    }

    fn type_mapping(&self) -> TypeMapping {
        let blog = TypeMapping::new()
            .with_field("id", FieldMapping::typed("long"))
            .with_field("name", FieldMapping::typed("string"))
            .with_field("description", FieldMapping::typed("string"));
        TypeMapping::new()
            .with_field(
                "created_at",
                FieldMapping::formatted("date", "dateOptionalTime"),
            )
            .with_field("title", FieldMapping::typed("string"))
            .with_field("body", FieldMapping::typed("string"))
            .with_field("slug", FieldMapping::typed("string"))
            .with_field("blog", FieldMapping::object(blog))
    }

    fn should_index(&self, post: &BlogPost) -> bool {
        self.should_index_calls.fetch_add(1, Ordering::SeqCst);
        post.slug != DO_NOT_INDEX
    }

    fn request_params(&self, _post: &BlogPost) -> RequestParams {
        RequestParams::new()
    }

    fn bulk_index_limit(&self) -> usize {
        self.bulk_limit
    }

    fn query_limit(&self) -> usize {
        self.query_limit
    }
}

/// A kind that keeps every default.
pub struct MinimalIndex;

impl Indexable for MinimalIndex {
    type Record = i64;
    type Source = VecSource<i64>;

    fn index_name(&self) -> &str {
        "numbers"
    }

    fn type_name(&self) -> &str {
        "number"
    }

    fn document_id(&self, record: &i64) -> Result<String> {
        Ok(record.to_string())
    }

    fn document(&self, record: &i64) -> Result<Document> {
        Ok(Document::builder().add_integer("value", *record).build())
    }

    fn records(&self) -> Result<VecSource<i64>> {
        Ok(VecSource::new(Vec::new()))
    }
}
