pub mod admin;
pub mod auth;
pub mod portfolio;
pub mod sql;
pub mod uploads;

use actix_web::web;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Public showcase ──
    cfg.service(
        web::scope("/portfolios")
            .route("", web::get().to(portfolio::get_portfolios))
            .route("/featured", web::get().to(portfolio::get_featured))
            .route("/{id}", web::get().to(portfolio::get_portfolio)),
    );

    // ── Auth ──
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(auth::login))
            .route("/logout", web::post().to(auth::logout))
            .route("/session", web::get().to(auth::session)),
    );

    // ── Admin (every handler takes an AdminSession) ──
    cfg.service(
        web::scope("/admin")
            .route("/dashboard", web::get().to(admin::dashboard))
            .route("/portfolios", web::get().to(admin::list_portfolios))
            .route("/portfolios", web::post().to(admin::create_portfolio))
            .route("/portfolios/new", web::get().to(admin::new_draft))
            .route("/portfolios/{id}", web::put().to(admin::update_portfolio))
            .route("/portfolios/{id}", web::delete().to(admin::delete_portfolio))
            .route("/portfolios/{id}/draft", web::get().to(admin::get_draft))
            .route("/portfolios/{id}/featured", web::put().to(admin::set_featured))
            .route("/drafts/edit", web::post().to(admin::edit_draft))
            .route("/uploads", web::post().to(uploads::upload_image))
            .route("/activity", web::get().to(admin::get_activity))
            .route("/activity", web::delete().to(admin::clear_activity))
            .route("/sql", web::post().to(sql::run_query))
            .route("/sql/history", web::get().to(sql::get_history))
            .route("/sql/history", web::delete().to(sql::clear_history)),
    );
}
