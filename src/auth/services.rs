use lazy_static::lazy_static;
use regex::Regex;
use time::Date;
use tracing::warn;

use crate::{
    auth::{
        dto::SignUpRequest,
        password::{CredentialHasher, DUMMY_DIGEST},
    },
    error::ApiError,
    users::{
        repo::UserStore,
        repo_types::{Gender, NewUser, User},
    },
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_phone(phone: &str) -> bool {
    lazy_static! {
        static ref PHONE_RE: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
    }
    PHONE_RE.is_match(phone)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Sign-up form after normalisation and validation, password still in clear.
pub(crate) struct SignUpForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub date_of_birth: Date,
    pub gender: Gender,
    pub address: String,
    pub profile_image: Option<String>,
}

impl SignUpForm {
    pub fn validate(req: SignUpRequest, today: Date) -> Result<Self, ApiError> {
        let invalid = |msg: &str| Err(ApiError::Validation(msg.to_string()));

        let name = req.name.trim().to_string();
        if name.is_empty() {
            return invalid("Name is required");
        }

        let email = normalize_email(&req.email);
        if !is_valid_email(&email) {
            return invalid("Invalid email");
        }

        let phone = req
            .phone
            .map(|p| p.chars().filter(|c| !matches!(c, ' ' | '-')).collect::<String>())
            .filter(|p| !p.is_empty());
        if phone.as_deref().is_some_and(|p| !is_valid_phone(p)) {
            return invalid("Invalid phone number");
        }

        if req.password.chars().count() < 8 {
            return invalid("Password must be at least 8 characters");
        }
        if req.password != req.confirm_password {
            return invalid("Passwords do not match");
        }

        if req.date_of_birth > today {
            return invalid("Date of birth cannot be in the future");
        }

        let address = req.address.trim().to_string();
        if address.is_empty() {
            return invalid("Address is required");
        }

        Ok(Self {
            name,
            email,
            phone,
            password: req.password,
            date_of_birth: req.date_of_birth,
            gender: req.gender,
            address,
            profile_image: req.profile_image.filter(|p| !p.trim().is_empty()),
        })
    }
}

/// Check `email`/`password` against the store. Unknown email and wrong password
/// produce the same error.
pub async fn authenticate(
    users: &dyn UserStore,
    hasher: &dyn CredentialHasher,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    let email = normalize_email(email);

    let Some(user) = users.find_by_email(&email).await? else {
        let _ = hasher.verify(password, DUMMY_DIGEST);
        warn!(email = %email, "sign-in unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !hasher.verify(password, &user.password_hash)? {
        warn!(user_id = %user.id, "sign-in wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    Ok(user)
}

/// Validate, hash and persist a new voter with a pending verification status.
pub async fn register(
    users: &dyn UserStore,
    hasher: &dyn CredentialHasher,
    req: SignUpRequest,
    today: Date,
) -> Result<User, ApiError> {
    let form = SignUpForm::validate(req, today)?;

    if users.find_by_email(&form.email).await?.is_some() {
        warn!(email = %form.email, "email already registered");
        return Err(ApiError::Conflict("Email"));
    }
    if let Some(phone) = &form.phone {
        if users.find_by_phone(phone).await?.is_some() {
            warn!("phone already registered");
            return Err(ApiError::Conflict("Phone number"));
        }
    }

    let password_hash = hasher.hash(&form.password)?;
    let user = users
        .insert(NewUser {
            name: form.name,
            email: form.email,
            phone: form.phone,
            password_hash,
            date_of_birth: form.date_of_birth,
            gender: form.gender,
            address: form.address,
            profile_image: form.profile_image,
        })
        .await?;
    Ok(user)
}
