use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate, Debug)]
pub struct SignUpInput {
    #[validate(length(min = 2, message = "Username must be atleast 2 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be atleast 8 characters"))]
    pub password: String,
}

#[derive(Deserialize, Validate, Debug)]
pub struct LoginInput {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be atleast 8 characters long"))]
    pub password: String,
}
