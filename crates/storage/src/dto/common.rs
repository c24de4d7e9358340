use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct LimitParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    10
}

impl Default for LimitParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl LimitParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > 100 {
            return Err("limit must be between 1 and 100".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limit_is_valid() {
        assert!(LimitParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_limits() {
        assert!(LimitParams { limit: 0 }.validate().is_err());
        assert!(LimitParams { limit: 101 }.validate().is_err());
        assert!(LimitParams { limit: 100 }.validate().is_ok());
    }
}
