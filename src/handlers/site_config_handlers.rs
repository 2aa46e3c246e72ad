use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::site_config::{self, SiteConfig};

/// GET /api/admin/site-config
pub async fn show(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let config = site_config::load(&conn)?;
    Ok(HttpResponse::Ok().json(config))
}

/// PUT /api/admin/site-config
pub async fn save(
    pool: web::Data<DbPool>,
    body: web::Json<SiteConfig>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    site_config::save(&conn, &body)?;
    log::info!("Site configuration saved");
    Ok(HttpResponse::Ok().json(json!({ "status": "saved" })))
}
