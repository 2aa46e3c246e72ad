pub mod hero_image;
pub mod page;
pub mod project;
pub mod service_item;
pub mod site_config;
pub mod social_link;
pub mod translation;

pub use hero_image::HeroImage;
pub use page::Page;
pub use project::Project;
pub use service_item::ServiceItem;
pub use site_config::{LinkItem, SiteConfig};
pub use social_link::SocialLink;
pub use translation::Translation;
