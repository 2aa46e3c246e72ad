use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::db::DbPool;
use crate::errors::AppError;
use crate::moc::{
    Collection, Direction, LogSink, MoveOutcome, OrderedRecord, Payload, RecordId, RecordStore,
    SaveOutcome, SqliteStore, confirm_destructive,
};

fn store<P: Payload>(pool: &web::Data<DbPool>) -> SqliteStore<P> {
    SqliteStore::new(pool.get_ref().clone())
}

/// GET /api/admin/{collection} — current remote state, in display order.
pub async fn list<P: Payload>(pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let records = store::<P>(&pool).fetch_all()?;
    Ok(HttpResponse::Ok().json(records))
}

/// PUT /api/admin/{collection} — the client submits the full desired list;
/// the current remote state serves as the diff baseline.
pub async fn save<P: Payload>(
    pool: web::Data<DbPool>,
    body: web::Json<Vec<OrderedRecord<P>>>,
) -> Result<HttpResponse, AppError> {
    let store = store::<P>(&pool);
    let mut collection = Collection::load(&store)?;
    collection.set_items(body.into_inner());

    match collection.save(&store, &LogSink)? {
        SaveOutcome::Saved(report) => Ok(HttpResponse::Ok().json(json!({
            "status": "saved",
            "deleted": report.deleted,
            "upserted": report.upserted,
            "records": collection.items(),
        }))),
        SaveOutcome::NoChanges => Ok(HttpResponse::Ok().json(json!({
            "status": "no_changes",
            "records": collection.items(),
        }))),
        SaveOutcome::InFlight => Err(AppError::SaveInFlight),
    }
}

#[derive(Deserialize)]
pub struct MoveBody {
    pub direction: Direction,
}

/// POST /api/admin/{collection}/{id}/move — optimistic neighbour swap.
pub async fn move_item<P: Payload>(
    pool: web::Data<DbPool>,
    path: web::Path<RecordId>,
    body: web::Json<MoveBody>,
) -> Result<HttpResponse, AppError> {
    let store = store::<P>(&pool);
    let mut collection = Collection::load(&store)?;
    let id = path.into_inner();
    let index = collection
        .items()
        .iter()
        .position(|r| r.id == Some(id))
        .ok_or(AppError::NotFound)?;

    let status = match collection.move_record(index, body.direction, &store, &LogSink)? {
        MoveOutcome::Moved => "moved",
        MoveOutcome::OutOfBounds | MoveOutcome::LocalOnly => "unchanged",
    };
    Ok(HttpResponse::Ok().json(json!({
        "status": status,
        "records": collection.items(),
    })))
}

#[derive(Deserialize)]
pub struct PublishBody {
    pub published: bool,
}

/// POST /api/admin/{collection}/{id}/publish — optimistic publish toggle.
/// 404 for collections without a publish flag.
pub async fn set_published<P: Payload>(
    pool: web::Data<DbPool>,
    path: web::Path<RecordId>,
    body: web::Json<PublishBody>,
) -> Result<HttpResponse, AppError> {
    let store = store::<P>(&pool);
    let mut collection = Collection::load(&store)?;
    let id = path.into_inner();
    let index = collection
        .items()
        .iter()
        .position(|r| r.id == Some(id))
        .ok_or(AppError::NotFound)?;
    let current = collection.items()[index]
        .published
        .ok_or(AppError::NotFound)?;

    if current == body.published {
        return Ok(HttpResponse::Ok().json(json!({
            "status": "no_changes",
            "published": current,
        })));
    }
    let published = collection.toggle_published(index, &store, &LogSink)?;
    Ok(HttpResponse::Ok().json(json!({
        "status": "saved",
        "published": published,
    })))
}

/// DELETE /api/admin/{collection}/{id} — routed through the sink's confirm
/// hook, then saved as a one-record diff.
pub async fn delete_item<P: Payload>(
    pool: web::Data<DbPool>,
    path: web::Path<RecordId>,
) -> Result<HttpResponse, AppError> {
    let store = store::<P>(&pool);
    let mut collection = Collection::load(&store)?;
    let id = path.into_inner();
    let index = collection
        .items()
        .iter()
        .position(|r| r.id == Some(id))
        .ok_or(AppError::NotFound)?;

    let message = format!("Delete record {id} from {}?", P::TABLE);
    let outcome = confirm_destructive(&LogSink, &message, || {
        collection.remove(index);
        collection.save(&store, &LogSink)
    });
    match outcome {
        Some(result) => {
            result?;
            Ok(HttpResponse::Ok().json(json!({ "status": "deleted", "id": id })))
        }
        None => Ok(HttpResponse::Ok().json(json!({ "status": "cancelled", "id": id }))),
    }
}
