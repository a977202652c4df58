use askama::Template;

use crate::api::types::Program;

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub app_name: String,
    pub csrf_token: String,
    pub flash: Option<String>,
    pub error: Option<String>,
    pub email: String,
}

#[derive(Template)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub app_name: String,
    pub csrf_token: String,
    pub error: Option<String>,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct LandingTemplate {
    pub app_name: String,
    pub programs: Vec<Program>,
    /// Set when the visitor is already logged in.
    pub home_path: Option<String>,
}
