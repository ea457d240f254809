//! HTTP request handlers.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod cache;
pub mod health;
pub mod links;
pub mod redirect;

pub use cache::{cache_clear_handler, cache_invalidate_handler, cache_keys_handler};
pub use health::health_handler;
pub use links::{
    create_link_handler, delete_link_handler, get_link_handler, links_list_handler,
    update_link_handler,
};
pub use redirect::{redirect_handler, root_redirect_handler};
