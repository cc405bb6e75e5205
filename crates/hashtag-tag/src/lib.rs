pub mod source;

pub use source::TagHashtagDataSource;
