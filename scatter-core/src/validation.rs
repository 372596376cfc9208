use crate::config::ConfigError;

pub struct Validator;

impl Validator {
    pub fn finite(name: &str, value: f64) -> Result<(), ConfigError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(format!("{name} must be finite, got {value}")))
        }
    }

    pub fn finite_all(name: &str, values: &[f64]) -> Result<(), ConfigError> {
        for (idx, value) in values.iter().enumerate() {
            Self::finite(&format!("{name}[{idx}]"), *value)?;
        }
        Ok(())
    }

    pub fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
        Self::finite(name, value)?;
        if value > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
        }
    }

    pub fn nonzero(name: &str, value: f64) -> Result<(), ConfigError> {
        Self::finite(name, value)?;
        if value != 0.0 {
            Ok(())
        } else {
            Err(ConfigError::Invalid(format!("{name} must not be zero")))
        }
    }

    pub fn normalize_workers(workers: &mut usize) {
        if *workers == 0 {
            *workers = 1;
        }
    }
}
