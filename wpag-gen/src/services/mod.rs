//! Remote service clients and content helpers

pub mod completion_client;
pub mod markdown;
pub mod tag_manager;
pub mod wordpress_client;

pub use completion_client::{ChatMessage, CompletionClient, CompletionError, CompletionSettings};
pub use tag_manager::TagManager;
pub use wordpress_client::{
    Credentials, NewPost, PostUpdate, WordPressClient, WpError, WpPost, WpTag,
};
