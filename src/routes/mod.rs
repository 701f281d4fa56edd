pub mod availability;
pub mod booking;
pub mod health;
pub mod pricing;
pub mod pricing_config;
pub mod resort;

use chrono::NaiveDate;

use crate::errors::ApiError;

/// The `date` query parameter is required on both engine endpoints.
pub(crate) fn parse_date_param(value: Option<&str>) -> Result<NaiveDate, ApiError> {
    let raw = value.ok_or_else(|| ApiError::validation("date query parameter is required"))?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation("date must be formatted YYYY-MM-DD"))
}

/// Zero-padded key used for the string date range filters in the store.
pub(crate) fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_param() {
        assert!(parse_date_param(None).is_err());
        assert!(parse_date_param(Some("06/20/2025")).is_err());
        let date = parse_date_param(Some("2025-06-20")).unwrap();
        assert_eq!(date_key(date), "2025-06-20");
    }

    #[test]
    fn test_date_key_is_zero_padded() {
        let date = parse_date_param(Some("2025-6-2")).unwrap();
        assert_eq!(date_key(date), "2025-06-02");
    }
}
