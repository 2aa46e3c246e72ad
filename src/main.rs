use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};

use vitrine::db;
use vitrine::handlers::{self, public, site_config_handlers, translation_handlers};
use vitrine::models::{HeroImage, Page, Project, ServiceItem, SocialLink};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "data/site.db".to_string());
    if let Some(parent) = std::path::Path::new(&database_url).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).expect("Failed to create data directory");
    }

    let pool = db::init_pool(&database_url);
    db::run_migrations(&pool);
    db::seed_defaults(&pool);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "./static".to_string());
    std::fs::create_dir_all(&static_dir).expect("Failed to create static directory");

    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .service(
                web::scope("/api/admin")
                    .service(handlers::collection_routes::<Page>("/pages"))
                    .service(handlers::collection_routes::<Project>("/projects"))
                    .service(handlers::collection_routes::<ServiceItem>("/services"))
                    .service(handlers::collection_routes::<HeroImage>("/hero-images"))
                    .service(handlers::collection_routes::<SocialLink>("/social-links"))
                    .route("/site-config", web::get().to(site_config_handlers::show))
                    .route("/site-config", web::put().to(site_config_handlers::save))
                    .route("/translations", web::get().to(translation_handlers::list))
                    .route("/translations", web::put().to(translation_handlers::upsert))
                    .route(
                        "/translations/{language}/{key}",
                        web::delete().to(translation_handlers::delete),
                    ),
            )
            .route("/api/content", web::get().to(public::site_content))
            .route(
                "/api/translations/{language}",
                web::get().to(public::translations),
            )
            .service(Files::new("/", static_dir.clone()).index_file("index.html"))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
