use crate::domain::model::RegistrationFormData;
use crate::domain::ports::Notification;
use crate::utils::error::{MarketError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(MarketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(MarketError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MarketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(MarketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(MarketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(MarketError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!("Expected one of: {}", allowed.join(", ")),
    })
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(MarketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MarketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

// Registration rules.

static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

static PHONE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").ok());

pub const MIN_PASSWORD_LEN: usize = 8;

/// The first registration rule a form breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationViolation {
    MissingUserType,
    IncompletePersonalInfo,
    InvalidEmail,
    InvalidPhone,
    PasswordTooShort,
    IncompleteAddress,
}

impl RegistrationViolation {
    pub fn title(&self) -> &'static str {
        match self {
            RegistrationViolation::MissingUserType => "Choose an account type",
            RegistrationViolation::IncompletePersonalInfo => "Incomplete information",
            RegistrationViolation::InvalidEmail => "Invalid email address",
            RegistrationViolation::InvalidPhone => "Invalid phone number",
            RegistrationViolation::PasswordTooShort => "Password too short",
            RegistrationViolation::IncompleteAddress => "Incomplete information",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RegistrationViolation::MissingUserType => "Please choose an account type to continue",
            RegistrationViolation::IncompletePersonalInfo => {
                "Please fill in all the required information"
            }
            RegistrationViolation::InvalidEmail => "Please enter a valid email address",
            RegistrationViolation::InvalidPhone => "Please enter a 10-digit phone number",
            RegistrationViolation::PasswordTooShort => {
                "The password must be at least 8 characters long"
            }
            RegistrationViolation::IncompleteAddress => {
                "Please fill in all the required address information"
            }
        }
    }

    pub fn to_notification(self) -> Notification {
        Notification::error(self.title(), self.description())
    }
}

impl fmt::Display for RegistrationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.description())
    }
}

fn matches(pattern: &LazyLock<Option<Regex>>, value: &str) -> bool {
    pattern.as_ref().is_some_and(|re| re.is_match(value))
}

pub fn is_valid_email(email: &str) -> bool {
    matches(&EMAIL_PATTERN, email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    matches(&PHONE_PATTERN, phone)
}

pub fn check_account_type(form: &RegistrationFormData) -> std::result::Result<(), RegistrationViolation> {
    if form.user_type.is_none() {
        return Err(RegistrationViolation::MissingUserType);
    }
    Ok(())
}

/// Checked in order: completeness, email, phone, password length.
pub fn check_personal_info(
    form: &RegistrationFormData,
) -> std::result::Result<(), RegistrationViolation> {
    let required = [
        &form.first_name,
        &form.last_name,
        &form.email,
        &form.phone,
        &form.password,
    ];
    if required.iter().any(|value| value.is_empty()) {
        return Err(RegistrationViolation::IncompletePersonalInfo);
    }
    if !is_valid_email(&form.email) {
        return Err(RegistrationViolation::InvalidEmail);
    }
    if !is_valid_phone(&form.phone) {
        return Err(RegistrationViolation::InvalidPhone);
    }
    // UTF-16 code units, like an input's length
    if form.password.encode_utf16().count() < MIN_PASSWORD_LEN {
        return Err(RegistrationViolation::PasswordTooShort);
    }
    Ok(())
}

/// The profile image is optional.
pub fn check_address(form: &RegistrationFormData) -> std::result::Result<(), RegistrationViolation> {
    let required = [
        &form.governorate,
        &form.city,
        &form.street,
        &form.detailed_address,
    ];
    if required.iter().any(|value| value.is_empty()) {
        return Err(RegistrationViolation::IncompleteAddress);
    }
    Ok(())
}
