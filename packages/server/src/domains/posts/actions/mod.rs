pub mod core;
pub mod tags;

pub use self::core::{
    create_post, delete_post, get_post_by_id, get_post_by_slug, increment_view_count, list_posts,
    search_posts, spawn_view_count_increment, update_post, MAX_LIST_LIMIT,
};
pub use tags::{link_post_tags, sync_post_tags};
