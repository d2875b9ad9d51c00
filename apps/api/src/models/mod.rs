pub mod campaign;
pub mod post;

pub use campaign::{Campaign, NewCampaign};
pub use post::{ContentType, NewPost, Platform, Post, PostPatch, PostStatus};
