pub mod feed;

pub use feed::FeedApi;
