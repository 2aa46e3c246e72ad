//! Admin API endpoints end to end: submit-full-list saves, optimistic move
//! and publish, delete, and the public content feed.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, Error, test, web};
use serde_json::{Value, json};

use vitrine::db::DbPool;
use vitrine::handlers::{self, public};
use vitrine::models::{Page, SocialLink};

mod common;
use common::setup_pool;

fn admin_app(
    pool: DbPool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(pool))
        .service(
            web::scope("/api/admin")
                .service(handlers::collection_routes::<Page>("/pages"))
                .service(handlers::collection_routes::<SocialLink>("/social-links")),
        )
        .route("/api/content", web::get().to(public::site_content))
}

fn page_body(slug: &str, title: &str) -> Value {
    json!({
        "slug": slug,
        "title": title,
        "content": "",
        "is_original_page": false,
        "order": 0,
    })
}

#[actix_rt::test]
async fn test_put_then_get_pages() {
    let (_dir, pool) = setup_pool();
    let app = test::init_service(admin_app(pool)).await;

    let req = test::TestRequest::put()
        .uri("/api/admin/pages")
        .set_json(json!([page_body("home", "Home"), page_body("about", "About")]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "saved");
    assert_eq!(body["upserted"], 2);
    assert_eq!(body["deleted"], 0);

    let req = test::TestRequest::get().uri("/api/admin/pages").to_request();
    let pages: Value = test::call_and_read_body_json(&app, req).await;
    let pages = pages.as_array().expect("array");
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0]["slug"], "home");
    assert_eq!(pages[0]["order"], 0);
    assert_eq!(pages[1]["slug"], "about");
    assert_eq!(pages[1]["order"], 1);
}

#[actix_rt::test]
async fn test_invalid_slug_is_rejected_with_400() {
    let (_dir, pool) = setup_pool();
    let app = test::init_service(admin_app(pool)).await;

    let req = test::TestRequest::put()
        .uri("/api/admin/pages")
        .set_json(json!([page_body("Not A Slug", "Broken")]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
async fn test_move_endpoint_swaps_neighbours() {
    let (_dir, pool) = setup_pool();
    let app = test::init_service(admin_app(pool)).await;

    let req = test::TestRequest::put()
        .uri("/api/admin/pages")
        .set_json(json!([
            page_body("p1", "P1"),
            page_body("p2", "P2"),
            page_body("p3", "P3"),
        ]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let last_id = body["records"][2]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/pages/{last_id}/move"))
        .set_json(json!({ "direction": "up" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "moved");

    let req = test::TestRequest::get().uri("/api/admin/pages").to_request();
    let pages: Value = test::call_and_read_body_json(&app, req).await;
    let slugs: Vec<&str> = pages
        .as_array()
        .expect("array")
        .iter()
        .map(|p| p["slug"].as_str().expect("slug"))
        .collect();
    assert_eq!(slugs, vec!["p1", "p3", "p2"]);
}

#[actix_rt::test]
async fn test_publish_endpoint_and_public_feed() {
    let (_dir, pool) = setup_pool();
    let app = test::init_service(admin_app(pool)).await;

    let req = test::TestRequest::put()
        .uri("/api/admin/pages")
        .set_json(json!([page_body("home", "Home"), page_body("draft", "Draft")]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let home_id = body["records"][0]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/pages/{home_id}/publish"))
        .set_json(json!({ "published": true }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "saved");
    assert_eq!(body["published"], true);

    // The public feed only carries the published page.
    let req = test::TestRequest::get().uri("/api/content").to_request();
    let content: Value = test::call_and_read_body_json(&app, req).await;
    let pages = content["pages"].as_array().expect("pages");
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["slug"], "home");
    assert_eq!(content["config"]["projects_section_title"], "Projects");
}

#[actix_rt::test]
async fn test_publish_on_unpublishable_collection_is_404() {
    let (_dir, pool) = setup_pool();
    let app = test::init_service(admin_app(pool)).await;

    let req = test::TestRequest::put()
        .uri("/api/admin/social-links")
        .set_json(json!([{
            "platform": "GitHub",
            "url": "https://github.com/acme",
            "icon": "github",
            "order": 0,
        }]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["records"][0]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/social-links/{id}/publish"))
        .set_json(json!({ "published": true }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn test_delete_endpoint_removes_one_record() {
    let (_dir, pool) = setup_pool();
    let app = test::init_service(admin_app(pool)).await;

    let req = test::TestRequest::put()
        .uri("/api/admin/pages")
        .set_json(json!([page_body("home", "Home"), page_body("old", "Old")]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let old_id = body["records"][1]["id"].as_i64().expect("id");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/pages/{old_id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "deleted");

    let req = test::TestRequest::get().uri("/api/admin/pages").to_request();
    let pages: Value = test::call_and_read_body_json(&app, req).await;
    let pages = pages.as_array().expect("array");
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0]["slug"], "home");

    // Deleting again is a 404: the id no longer exists in the collection.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/admin/pages/{old_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
