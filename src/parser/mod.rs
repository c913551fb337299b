//! Post parsing: rendered markup in, [`PostRecord`](crate::domain::PostRecord) out.
//!
//! ```text
//! HTML snapshot → HtmlAdapter → PostNode (InlineNode tree) → PostParser → PostRecord
//! ```

mod config;
mod html;
pub mod inline;
mod post;

pub use config::ParserConfig;
pub use html::HtmlAdapter;
pub use inline::{escape_markdown, InlineNode};
pub use post::{PostNode, PostParser};
