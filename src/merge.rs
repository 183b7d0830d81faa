use std::collections::HashSet;

use crate::model::{FeedId, Post, PostFields};

/// Posts among `candidates` that `known` does not already hold for `feed_id`,
/// each with a fresh identity, in candidate order.
///
/// Duplicates inside `candidates` itself are not collapsed; only `known` is consulted.
pub fn merge_new_posts(candidates: Vec<PostFields>, feed_id: FeedId, known: &[Post]) -> Vec<Post> {
    let seen: HashSet<&str> = known.iter().filter(|p| p.feed_id == feed_id).map(|p| p.title.as_str()).collect();
    candidates
        .into_iter()
        .filter(|c| !seen.contains(c.title.as_str()))
        .map(|c| Post::new(feed_id, c))
        .collect()
}
