//! Client-side form validation
//!
//! Every form is checked with [`validator::Validate`] before the request that
//! carries it is built, so invalid input never reaches the network.

use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::domain::value_objects::Money;

#[derive(Clone, Debug, Serialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Clone, Debug, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 2, max = 50))]
    pub name: String,
    #[validate(length(min = 2, max = 50))]
    pub surname: String,
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,
    #[validate(length(min = 8), custom = "password_strength")]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

#[derive(Clone, Debug, Validate)]
pub struct PasswordChangeForm {
    /// Token from the reset email; absent when the user is already logged in.
    pub reset_token: Option<String>,
    #[validate(length(min = 8), custom = "password_strength")]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirmation: String,
}

#[derive(Clone, Debug, Validate)]
pub struct PublicationForm {
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    #[validate(length(max = 2000))]
    pub description: String,
    #[validate(custom = "positive_price")]
    pub price: Money,
    pub stock: u32,
    #[validate(length(min = 1, message = "Pick a category"))]
    pub category_id: String,
}

#[derive(Clone, Debug, Validate)]
pub struct CategoryForm {
    #[validate(length(min = 2, max = 50))]
    pub name: String,
}

fn password_strength(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(|c| c.is_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if has_letter && has_digit { Ok(()) } else { Err(ValidationError::new("weak_password")) }
}

fn positive_price(price: &Money) -> Result<(), ValidationError> {
    if price.is_positive() { Ok(()) } else { Err(ValidationError::new("non_positive_price")) }
}
