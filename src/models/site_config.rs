use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkItem {
    pub text: String,
    pub url: String,
}

/// Global site configuration, persisted as a singleton row (id = 1).
///
/// Not a managed collection: the nav and footer link lists are edited and
/// saved wholesale as part of this one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub logo_url: String,
    #[serde(default)]
    pub logo_icon_name: String,
    #[serde(default)]
    pub nav_links: Vec<LinkItem>,
    #[serde(default)]
    pub footer_links: Vec<LinkItem>,
    #[serde(default)]
    pub footer_links_title: String,
    #[serde(default)]
    pub blog_title: String,
    #[serde(default)]
    pub services_section_title: String,
    #[serde(default)]
    pub projects_section_title: String,
    #[serde(default)]
    pub products_section_title: String,
    #[serde(default)]
    pub contact_section_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            logo_url: String::new(),
            logo_icon_name: "sparkles".to_string(),
            nav_links: Vec::new(),
            footer_links: Vec::new(),
            footer_links_title: "Links".to_string(),
            blog_title: "Blog".to_string(),
            services_section_title: "Services".to_string(),
            projects_section_title: "Projects".to_string(),
            products_section_title: "Products".to_string(),
            contact_section_title: "Contact".to_string(),
        }
    }
}

fn validate_links(field: &'static str, links: &[LinkItem]) -> Result<(), ValidationError> {
    for link in links {
        if link.text.trim().is_empty() || link.url.trim().is_empty() {
            return Err(ValidationError::new(field, "links need both a text and a url"));
        }
    }
    Ok(())
}

pub fn validate(config: &SiteConfig) -> Result<(), ValidationError> {
    validate_links("nav_links", &config.nav_links)?;
    validate_links("footer_links", &config.footer_links)?;
    Ok(())
}

/// Load the singleton config. A missing row means the site was never
/// configured — defaults are returned, not an error.
pub fn load(conn: &Connection) -> Result<SiteConfig, AppError> {
    let result = conn.query_row(
        "SELECT logo_url, logo_icon_name, nav_links, footer_links, footer_links_title, \
                blog_title, services_section_title, projects_section_title, \
                products_section_title, contact_section_title \
         FROM site_config WHERE id = 1",
        [],
        |row| {
            let nav_links: String = row.get("nav_links")?;
            let footer_links: String = row.get("footer_links")?;
            Ok(SiteConfig {
                logo_url: row.get("logo_url")?,
                logo_icon_name: row.get("logo_icon_name")?,
                nav_links: serde_json::from_str(&nav_links).unwrap_or_default(),
                footer_links: serde_json::from_str(&footer_links).unwrap_or_default(),
                footer_links_title: row.get("footer_links_title")?,
                blog_title: row.get("blog_title")?,
                services_section_title: row.get("services_section_title")?,
                projects_section_title: row.get("projects_section_title")?,
                products_section_title: row.get("products_section_title")?,
                contact_section_title: row.get("contact_section_title")?,
            })
        },
    );
    match result {
        Ok(config) => Ok(config),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(SiteConfig::default()),
        Err(e) => Err(e.into()),
    }
}

/// Upsert the singleton row.
pub fn save(conn: &Connection, config: &SiteConfig) -> Result<(), AppError> {
    validate(config)?;
    let nav_links = serde_json::to_string(&config.nav_links).unwrap_or_else(|_| "[]".to_string());
    let footer_links =
        serde_json::to_string(&config.footer_links).unwrap_or_else(|_| "[]".to_string());
    conn.execute(
        "INSERT INTO site_config (id, logo_url, logo_icon_name, nav_links, footer_links, \
                                  footer_links_title, blog_title, services_section_title, \
                                  projects_section_title, products_section_title, \
                                  contact_section_title, updated_at) \
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) \
         ON CONFLICT(id) DO UPDATE SET \
             logo_url = excluded.logo_url, \
             logo_icon_name = excluded.logo_icon_name, \
             nav_links = excluded.nav_links, \
             footer_links = excluded.footer_links, \
             footer_links_title = excluded.footer_links_title, \
             blog_title = excluded.blog_title, \
             services_section_title = excluded.services_section_title, \
             projects_section_title = excluded.projects_section_title, \
             products_section_title = excluded.products_section_title, \
             contact_section_title = excluded.contact_section_title, \
             updated_at = excluded.updated_at",
        params![
            config.logo_url,
            config.logo_icon_name,
            nav_links,
            footer_links,
            config.footer_links_title,
            config.blog_title,
            config.services_section_title,
            config.projects_section_title,
            config.products_section_title,
            config.contact_section_title,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(())
}
