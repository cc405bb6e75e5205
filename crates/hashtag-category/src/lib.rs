//! hashtag-category
//!
//! Category-backed hashtag data source. Categories resolve by `slug` or by
//! `parent:child` and link to `/c/<parent>/<child>/<id>`.

pub mod source;

pub use source::CategoryHashtagDataSource;
