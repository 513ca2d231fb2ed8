// src/queries.rs

//! Reads shared by more than one screen.

use crate::{
    models::{comment::Comment, listing::SortMode, post::Post},
    supabase::{DataClient, DataError, Direction},
};

pub const POSTS: &str = "posts";
pub const COMMENTS: &str = "comments";

pub async fn list_posts(client: &DataClient, sort: SortMode) -> Result<Vec<Post>, DataError> {
    client
        .from(POSTS)
        .order(sort.column(), Direction::Descending)
        .fetch_all()
        .await
}

pub async fn find_post(client: &DataClient, id: i64) -> Result<Option<Post>, DataError> {
    client.from(POSTS).eq("id", id).fetch_optional().await
}

/// Comments of one post, newest first.
pub async fn list_comments(client: &DataClient, post_id: i64) -> Result<Vec<Comment>, DataError> {
    client
        .from(COMMENTS)
        .eq("post_id", post_id)
        .order("created_at", Direction::Descending)
        .fetch_all()
        .await
}
