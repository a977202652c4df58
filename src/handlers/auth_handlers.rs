use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::api::ProgramApi;
use crate::auth::csrf;
use crate::auth::session::{portal_session, set_flash, take_flash};
use crate::errors::{AppError, redirect, render};
use crate::session::SignupDetails;
use crate::state::AppState;
use crate::templates_structs::{APP_NAME, LandingTemplate, LoginTemplate, SignupTemplate};

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    pub phone_number: String,
    pub csrf_token: String,
}

impl SignupForm {
    fn details(&self) -> SignupDetails {
        SignupDetails {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            confirm_password: self.confirm_password.clone(),
            phone_number: self.phone_number.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

/// GET /
pub async fn index(state: web::Data<AppState>, session: Session) -> Result<HttpResponse, AppError> {
    let auth = portal_session(&session);
    let programs = match state.api().programs().await {
        Ok(programs) => programs,
        Err(e) => {
            log::warn!("Could not load programs: {e}");
            Vec::new()
        }
    };
    render(LandingTemplate {
        app_name: APP_NAME.to_string(),
        programs,
        home_path: auth.is_authenticated().then(|| auth.home_path().to_string()),
    })
}

/// GET /auth/login
pub async fn login_page(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let mut auth = portal_session(&session);
    auth.initialize(state.api()).await;
    if auth.is_authenticated() {
        return Ok(redirect(auth.home_path()));
    }

    render(LoginTemplate {
        app_name: APP_NAME.to_string(),
        csrf_token: csrf::get_or_create_token(&session),
        flash: take_flash(&session),
        error: None,
        email: String::new(),
    })
}

/// POST /auth/login
pub async fn login_submit(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut auth = portal_session(&session);
    match auth.login(state.api(), &form.email, &form.password).await {
        Ok(()) => {
            log::info!("Login for {}", form.email.trim());
            Ok(redirect(auth.home_path()))
        }
        Err(e) => render(LoginTemplate {
            app_name: APP_NAME.to_string(),
            csrf_token: csrf::get_or_create_token(&session),
            flash: None,
            error: Some(e.to_string()),
            email: form.email.clone(),
        }),
    }
}

/// GET /auth/signup
pub async fn signup_page(
    state: web::Data<AppState>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let mut auth = portal_session(&session);
    auth.initialize(state.api()).await;
    if auth.is_authenticated() {
        return Ok(redirect(auth.home_path()));
    }

    render(SignupTemplate {
        app_name: APP_NAME.to_string(),
        csrf_token: csrf::get_or_create_token(&session),
        error: None,
        name: String::new(),
        email: String::new(),
        phone_number: String::new(),
    })
}

/// POST /auth/signup
pub async fn signup_submit(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut auth = portal_session(&session);
    match auth.signup(state.api(), &form.details()).await {
        Ok(()) => {
            set_flash(&session, "Account created. Please choose a program.");
            Ok(redirect(auth.home_path()))
        }
        Err(e) => render(SignupTemplate {
            app_name: APP_NAME.to_string(),
            csrf_token: csrf::get_or_create_token(&session),
            error: Some(e.to_string()),
            name: form.name.clone(),
            email: form.email.clone(),
            phone_number: form.phone_number.clone(),
        }),
    }
}

/// POST /auth/logout
pub async fn logout(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let mut auth = portal_session(&session);
    auth.logout(state.api()).await;
    set_flash(&session, "You have been logged out.");
    Ok(redirect("/auth/login"))
}
