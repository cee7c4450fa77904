//! Attribute validators run during schema validation

use crate::types::{Diagnostics, Dynamic};

pub trait Validator: Send + Sync {
    /// Human-readable description used in schema documentation
    fn description(&self) -> String;

    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Diagnostics);
}

/// Requires a string value to be one of a fixed set
pub struct StringInSetValidator {
    allowed: Vec<String>,
}

impl StringInSetValidator {
    pub fn new(allowed: &[&str]) -> Self {
        Self {
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Validator for StringInSetValidator {
    fn description(&self) -> String {
        format!("value must be one of: {}", self.allowed.join(", "))
    }

    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Diagnostics) {
        if let Some(s) = value.as_string() {
            if !self.allowed.iter().any(|a| a == s) {
                diagnostics.add_error(
                    format!(
                        "{} must be one of [{}]",
                        attribute_path,
                        self.allowed.join(", ")
                    ),
                    Some(format!("Got '{}'", s)),
                );
            }
        }
    }
}

/// Requires a number to fall within inclusive bounds
pub struct NumberRangeValidator {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Validator for NumberRangeValidator {
    fn description(&self) -> String {
        format!("value must be between {:?} and {:?}", self.min, self.max)
    }

    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Diagnostics) {
        if let Some(n) = value.as_number() {
            if let Some(min) = self.min {
                if n < min {
                    diagnostics.add_error(
                        format!("{} must be at least {}", attribute_path, min),
                        Some(format!("Got {}", n)),
                    );
                }
            }
            if let Some(max) = self.max {
                if n > max {
                    diagnostics.add_error(
                        format!("{} must be at most {}", attribute_path, max),
                        Some(format!("Got {}", n)),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_in_set_accepts_member() {
        let validator = StringInSetValidator::new(&["above", "below", "equal"]);

        let mut diags = Diagnostics::new();
        validator.validate(&Dynamic::String("above".to_string()), "comparison", &mut diags);

        assert_eq!(diags.errors.len(), 0);
    }

    #[test]
    fn string_in_set_rejects_non_member() {
        let validator = StringInSetValidator::new(&["above", "below", "equal"]);

        let mut diags = Diagnostics::new();
        validator.validate(&Dynamic::String("around".to_string()), "comparison", &mut diags);

        assert_eq!(diags.errors.len(), 1);
        assert!(diags.errors[0].summary.contains("comparison must be one of"));
    }

    #[test]
    fn string_in_set_ignores_non_string_values() {
        let validator = StringInSetValidator::new(&["any", "all"]);

        let mut diags = Diagnostics::new();
        validator.validate(&Dynamic::Number(1.0), "time_function", &mut diags);

        assert_eq!(diags.errors.len(), 0);
    }

    #[test]
    fn number_range_accepts_valid_number() {
        let validator = NumberRangeValidator {
            min: Some(1.0),
            max: Some(100.0),
        };

        let mut diags = Diagnostics::new();
        validator.validate(&Dynamic::Number(50.0), "duration", &mut diags);

        assert_eq!(diags.errors.len(), 0);
    }

    #[test]
    fn number_range_rejects_out_of_bounds() {
        let validator = NumberRangeValidator {
            min: Some(10.0),
            max: Some(20.0),
        };

        let mut diags = Diagnostics::new();
        validator.validate(&Dynamic::Number(5.0), "duration", &mut diags);
        validator.validate(&Dynamic::Number(25.0), "duration", &mut diags);

        assert_eq!(diags.errors.len(), 2);
        assert!(diags.errors[0].summary.contains("at least"));
        assert!(diags.errors[1].summary.contains("at most"));
    }
}
