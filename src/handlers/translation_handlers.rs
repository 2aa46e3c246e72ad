use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::translation::{self, Translation};

#[derive(Deserialize)]
pub struct TranslationQuery {
    pub language: Option<String>,
}

/// GET /api/admin/translations[?language=xx]
pub async fn list(
    pool: web::Data<DbPool>,
    query: web::Query<TranslationQuery>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let translations = translation::find_all(&conn, query.language.as_deref())?;
    Ok(HttpResponse::Ok().json(translations))
}

/// PUT /api/admin/translations — batch upsert, one transaction.
pub async fn upsert(
    pool: web::Data<DbPool>,
    body: web::Json<Vec<Translation>>,
) -> Result<HttpResponse, AppError> {
    let mut conn = pool.get()?;
    translation::upsert_many(&mut conn, &body)?;
    Ok(HttpResponse::Ok().json(json!({ "status": "saved", "count": body.len() })))
}

/// DELETE /api/admin/translations/{language}/{key}
pub async fn delete(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (language, key) = path.into_inner();
    let conn = pool.get()?;
    translation::delete(&conn, &key, &language)?;
    Ok(HttpResponse::Ok().json(json!({ "status": "deleted" })))
}
