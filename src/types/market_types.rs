use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate, Debug)]
pub struct CreateMarketInput {
    #[validate(length(min = 10, message = "Question must be atleast 10 characters"))]
    pub question: String,

    pub description: Option<String>,
    pub category: Option<String>,
    pub resolution_date: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ResolveMarketInput {
    pub market_id: i64,
    pub outcome: String,
}
