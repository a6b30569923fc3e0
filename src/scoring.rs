//! Crowd aggregation and resolution scoring.

/// Crowd prediction reported for a market with no forecasts.
pub const DEFAULT_CROWD_PREDICTION: i64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    pub fn parse(value: &str) -> Option<Outcome> {
        match value {
            "yes" => Some(Outcome::Yes),
            "no" => Some(Outcome::No),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Yes => "yes",
            Outcome::No => "no",
        }
    }
}

/// Mean of all forecast probabilities, rounded to the nearest whole
/// percentage point, with the forecast count. Defaults to 50 when the
/// market has no forecasts.
pub fn crowd_prediction(probabilities: &[f64]) -> (i64, usize) {
    if probabilities.is_empty() {
        return (DEFAULT_CROWD_PREDICTION, 0);
    }
    let mean = probabilities.iter().sum::<f64>() / probabilities.len() as f64;
    (mean.round() as i64, probabilities.len())
}

/// Tokens paid for a forecast once its market resolves.
///
/// Accuracy is the probability itself when the outcome is yes and its
/// complement when the outcome is no; the reward is half the accuracy,
/// floored. A perfectly confident correct forecast earns 50 tokens, a
/// perfectly confident wrong one earns 0.
pub fn resolution_reward(probability: f64, outcome: Outcome) -> i64 {
    let accuracy = match outcome {
        Outcome::Yes => probability,
        Outcome::No => 100.0 - probability,
    };
    (accuracy * 0.5).floor() as i64
}

/// Placeholder accuracy heuristic carried over from the original system.
///
/// Known-incorrect: it scores each resolved forecast by its distance from
/// 100 regardless of how the market actually resolved, so it measures
/// confidence, not correctness. A real replacement would compare against
/// the resolved outcome (e.g. a Brier score).
pub fn accuracy_estimate(resolved_probabilities: &[f64]) -> i64 {
    if resolved_probabilities.is_empty() {
        return 0;
    }
    let total: f64 = resolved_probabilities
        .iter()
        .map(|p| (100.0 - p).abs())
        .sum();
    (100.0 - total / resolved_probabilities.len() as f64).round() as i64
}
