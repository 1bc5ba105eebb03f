//! Configuration module

mod site;

pub use site::AuthorConfig;
pub use site::ContactConfig;
pub use site::HomeConfig;
pub use site::NewsletterConfig;
pub use site::SiteConfig;
pub use site::ThemeConfig;
