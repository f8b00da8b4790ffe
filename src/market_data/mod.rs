pub mod history_buffer;
pub mod news_feed;
pub mod price_feed;

pub use history_buffer::{HistoryBuffer, TickRejection};
pub use news_feed::{NewsFeed, NewsItem};
pub use price_feed::PriceFeed;
