pub mod lister;
pub mod packager;


pub use lister::list_inbox_articles;
pub use packager::{download_article, fetch_article};
