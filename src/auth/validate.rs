use crate::session::SignupDetails;

/// Email providers accepted at signup.
pub const EMAIL_PROVIDERS: [&str; 9] = [
    "gmail.com",
    "yahoo.com",
    "outlook.com",
    "hotmail.com",
    "icloud.com",
    "mail.com",
    "protonmail.com",
    "zoho.com",
    "aol.com",
];

/// Validate an email: must contain '@'.
pub fn validate_email(email: &str) -> Option<String> {
    if !email.trim().contains('@') {
        return Some("Valid email is required".to_string());
    }
    None
}

/// The part after '@' must be one of [`EMAIL_PROVIDERS`].
pub fn validate_email_provider(email: &str) -> Option<String> {
    let domain = email
        .trim()
        .split('@')
        .nth(1)
        .map(|d| d.to_lowercase())
        .unwrap_or_default();
    if !EMAIL_PROVIDERS.contains(&domain.as_str()) {
        return Some(
            "Please use a valid email provider (Gmail, Yahoo, Outlook, Hotmail, iCloud, etc.)"
                .to_string(),
        );
    }
    None
}

/// Validate a password: min 6 chars.
pub fn validate_password(password: &str) -> Option<String> {
    if password.len() < 6 {
        return Some("Password must be at least 6 characters".to_string());
    }
    None
}

/// Validate a required text field.
pub fn validate_required(value: &str, message: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some(message.to_string());
    }
    None
}

/// First problem with a login attempt, if any.
pub fn validate_login(email: &str, password: &str) -> Option<String> {
    validate_email(email).or_else(|| {
        if password.is_empty() {
            Some("Password is required".to_string())
        } else {
            None
        }
    })
}

/// First problem with a signup attempt, checked in form order.
pub fn validate_signup(details: &SignupDetails) -> Option<String> {
    validate_required(&details.name, "Full name is required")
        .or_else(|| validate_email(&details.email))
        .or_else(|| validate_email_provider(&details.email))
        .or_else(|| validate_password(&details.password))
        .or_else(|| {
            if details.password != details.confirm_password {
                Some("Passwords do not match".to_string())
            } else {
                None
            }
        })
        .or_else(|| validate_required(&details.phone_number, "Phone number is required"))
}
