pub mod config;
pub mod error;
pub mod i18n;
pub mod slug;
pub mod types;

pub use config::{STARTER_SITE_TOML, parse_site_toml, parse_site_toml_str};
pub use error::{Error, Result};
pub use i18n::{Language, t};
pub use slug::{SlugMatch, Sluggable, normalize_slug, resolve_slug};
pub use types::*;
