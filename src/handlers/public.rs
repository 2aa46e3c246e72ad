use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{HeroImage, Page, Project, ServiceItem, SocialLink, site_config, translation};
use crate::moc::{OrderedRecord, Payload, RecordStore, SqliteStore};

fn published<P: Payload>(pool: &web::Data<DbPool>) -> Result<Vec<OrderedRecord<P>>, AppError> {
    let store: SqliteStore<P> = SqliteStore::new(pool.get_ref().clone());
    let mut records = store.fetch_all()?;
    records.retain(|r| r.published == Some(true));
    Ok(records)
}

fn all<P: Payload>(pool: &web::Data<DbPool>) -> Result<Vec<OrderedRecord<P>>, AppError> {
    let store: SqliteStore<P> = SqliteStore::new(pool.get_ref().clone());
    Ok(store.fetch_all()?)
}

/// GET /api/content — everything the public site needs in one payload:
/// config plus published content, in display order.
pub async fn site_content(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let config = site_config::load(&conn)?;
    drop(conn);

    Ok(HttpResponse::Ok().json(json!({
        "config": config,
        "pages": published::<Page>(&pool)?,
        "projects": published::<Project>(&pool)?,
        "services": published::<ServiceItem>(&pool)?,
        "hero_images": all::<HeroImage>(&pool)?,
        "social_links": all::<SocialLink>(&pool)?,
    })))
}

/// GET /api/translations/{language}
pub async fn translations(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let language = path.into_inner();
    let translations = translation::find_all(&conn, Some(&language))?;
    Ok(HttpResponse::Ok().json(translations))
}
