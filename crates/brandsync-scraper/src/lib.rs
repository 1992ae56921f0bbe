pub mod capture;
pub mod client;
pub mod dom;
pub mod error;
pub mod extract;
pub mod reveal;

pub use capture::{capture_brand_section, render_standalone_page, CapturedSection};
pub use client::{resolve_url, PageLoader};
pub use dom::{DocumentModel, HtmlDocument};
pub use error::ScraperError;
pub use extract::{extract, ExtractOptions};
pub use reveal::{find_reveal_control, RevealControl};
