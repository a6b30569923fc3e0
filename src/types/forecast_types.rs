use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate, Debug)]
pub struct SubmitForecastInput {
    pub market_id: i64,

    #[validate(range(min = 0.0, max = 100.0, message = "Probability must be between 0 and 100"))]
    pub probability: f64,
}
