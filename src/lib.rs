pub mod canon;
pub mod category;
pub mod config;
pub mod error;
pub mod frame;
pub mod pipeline;

pub use canon::{canonicalize_column, Canonicalizer, Corpus, PassReport};
pub use config::{AppConfig, CanonConfig};
pub use error::{CanonError, Result};
