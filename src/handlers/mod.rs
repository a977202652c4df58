pub mod admin_handlers;
pub mod applicant_handlers;
pub mod auth_handlers;

use actix_web::middleware::from_fn;
use actix_web::{HttpResponse, web};

use crate::auth::middleware::{require_admin, require_applicant};

/// Register every portal route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use admin_handlers as admin;
    use applicant_handlers as applicant;

    cfg.route("/", web::get().to(auth_handlers::index))
        .service(
            web::scope("/auth")
                .route("/login", web::get().to(auth_handlers::login_page))
                .route("/login", web::post().to(auth_handlers::login_submit))
                .route("/signup", web::get().to(auth_handlers::signup_page))
                .route("/signup", web::post().to(auth_handlers::signup_submit))
                .route("/logout", web::post().to(auth_handlers::logout)),
        )
        .service(
            web::scope("/applicant")
                .wrap(from_fn(require_applicant))
                .route("/dashboard", web::get().to(applicant::dashboard::index))
                .route("/select-program", web::get().to(applicant::dashboard::select_program_page))
                .route("/select-program", web::post().to(applicant::dashboard::select_program_submit))
                .route("/application", web::get().to(applicant::application::form_page))
                .route("/application/save", web::post().to(applicant::application::save))
                .route("/application/submit", web::post().to(applicant::application::submit))
                .route("/admission-letter", web::get().to(applicant::letter::show))
                .route("/admission-letter/pdf", web::get().to(applicant::letter::download))
                .route("/payment", web::get().to(applicant::payment::index))
                .route("/payment/pay", web::post().to(applicant::payment::pay))
                .route("/payment/receipt/{id}", web::get().to(applicant::payment::receipt)),
        )
        .service(
            web::scope("/admin")
                .wrap(from_fn(require_admin))
                .route("/dashboard", web::get().to(admin::dashboard::index))
                .route("/applications", web::get().to(admin::applications::list))
                .route("/application/{id}", web::get().to(admin::applications::detail))
                .route("/application/{id}/review", web::post().to(admin::applications::review))
                .route("/preview-letter/{id}", web::get().to(admin::letters::preview))
                .route("/send-letters", web::get().to(admin::letters::send_form))
                .route("/send-letters", web::post().to(admin::letters::send_submit)),
        );
}

/// Fallback for unknown paths.
pub async fn not_found() -> HttpResponse {
    let html = include_str!("../../templates/errors/404.html");
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
