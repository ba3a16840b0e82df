// Home feed: the posts list with resolved image and avatar URLs.

use kidsdiy_api::models::Post;
use kidsdiy_api::{ProxyEndpoint, ProxyMethod, ProxyRequest};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::controller::{View, ViewController, decode, take_bodies};
use crate::error::CoreError;
use crate::render::media_url;

pub type FeedPage<P> = ViewController<P, FeedView>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub likes: u64,
    pub created_since: String,
    pub author: String,
    pub organization: Option<String>,
    pub avatar_url: Option<String>,
    pub image_urls: Vec<String>,
}

impl PostCard {
    pub fn from_post(post: Post, media_base: &Url) -> Self {
        Self {
            id: post.id,
            avatar_url: media_url(media_base, post.user.profile_picture.as_deref()),
            image_urls: post
                .images
                .iter()
                .filter_map(|p| media_url(media_base, Some(p)))
                .collect(),
            title: post.title,
            content: post.content,
            likes: post.likes,
            created_since: post.created_since.unwrap_or_default(),
            author: post.user.username,
            organization: post.user.organization,
        }
    }
}

pub struct FeedView {
    media_base: Url,
}

impl FeedView {
    pub fn new(media_base: Url) -> Self {
        Self { media_base }
    }
}

impl View for FeedView {
    type Payload = Vec<PostCard>;

    fn requests(&self) -> Vec<ProxyRequest> {
        vec![ProxyRequest::endpoint(ProxyMethod::Get, ProxyEndpoint::Posts)]
    }

    fn merge(&self, bodies: Vec<Value>) -> Result<Self::Payload, CoreError> {
        let [posts] = take_bodies(bodies)?;
        let posts: Vec<Post> = decode(posts)?;
        Ok(posts
            .into_iter()
            .map(|p| PostCard::from_post(p, &self.media_base))
            .collect())
    }
}
