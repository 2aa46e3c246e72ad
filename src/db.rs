use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::models::{site_config, translation::Translation};

pub type DbPool = Pool<SqliteConnectionManager>;

pub const MIGRATIONS: &str = include_str!("schema.sql");

pub fn init_pool(database_url: &str) -> DbPool {
    let manager = SqliteConnectionManager::file(database_url).with_init(|conn| {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        Ok(())
    });
    Pool::builder()
        .max_size(8)
        .build(manager)
        .expect("Failed to create DB pool")
}

pub fn run_migrations(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get DB connection for migrations");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");
    log::info!("Database migrations complete");
}

/// Seed the singleton site configuration and a starter translation set on
/// first boot. Idempotent: existing rows are left untouched.
pub fn seed_defaults(pool: &DbPool) {
    let conn = pool.get().expect("Failed to get DB connection for seeding");

    let has_config: bool = conn
        .query_row("SELECT COUNT(*) > 0 FROM site_config", [], |row| row.get(0))
        .unwrap_or(false);
    if !has_config {
        match site_config::save(&conn, &site_config::SiteConfig::default()) {
            Ok(()) => log::info!("Seeded default site configuration"),
            Err(e) => log::error!("Site config seed failed: {e}"),
        }
    }

    let has_translations: bool = conn
        .query_row("SELECT COUNT(*) > 0 FROM translations", [], |row| row.get(0))
        .unwrap_or(false);
    if has_translations {
        return;
    }

    let starter = [
        ("hero.title", "Welcome", "en"),
        ("hero.subtitle", "We build things that last", "en"),
        ("nav.blog", "Blog", "en"),
        ("nav.contact", "Contact", "en"),
        ("contact.cta", "Get in touch", "en"),
    ];
    for (key, value, language) in starter {
        let t = Translation {
            key: key.to_string(),
            value: value.to_string(),
            language: language.to_string(),
        };
        if let Err(e) = crate::models::translation::upsert(&conn, &t) {
            log::warn!("Translation seed {key}: {e}");
        }
    }
    log::info!("Seeded {} starter translations", starter.len());
}
