use serde::{Deserialize, Serialize};
use time::Date;

use crate::users::repo_types::{iso_date, Gender};

/// Request body for sign-in.
#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Registration form as submitted by the sign-up page.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub password: String,
    pub confirm_password: String,
    #[serde(with = "iso_date")]
    pub date_of_birth: Date,
    pub gender: Gender,
    pub address: String,
    #[serde(default)]
    pub profile_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
    pub success: bool,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            message,
            success: true,
        }
    }
}
