pub mod feed;
pub mod metadata;
