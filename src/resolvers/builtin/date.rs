//! Date resolver.
//!
//! Accepts a millisecond timestamp, an RFC 3339 date-time, or a plain
//! `YYYY-MM-DD` date (midnight UTC). Bounds are millisecond timestamps.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Identifier, UserError};
use crate::resolvers::builtin::numeric::{check_range, OutOfRange};
use crate::resolvers::context::ArgumentContext;
use crate::resolvers::registry::Resolver;

fn parse_date(parameter: &str) -> Option<DateTime<Utc>> {
    if let Ok(millis) = parameter.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(parameter) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(parameter, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

pub struct DateResolver;

#[async_trait]
impl Resolver for DateResolver {
    type Output = DateTime<Utc>;

    fn name(&self) -> &str {
        "date"
    }

    async fn run(
        &self,
        parameter: &str,
        context: &ArgumentContext,
    ) -> Result<DateTime<Utc>, UserError> {
        let date = parse_date(parameter).ok_or_else(|| {
            UserError::new(
                Identifier::ArgumentDateError,
                "The argument did not resolve to a valid date.",
            )
            .with_parameter(parameter)
        })?;

        match check_range(date.timestamp_millis() as f64, context) {
            None => Ok(date),
            Some(OutOfRange::Below) => Err(UserError::new(
                Identifier::ArgumentDateTooEarly,
                "The given date is too early.",
            )
            .with_parameter(parameter)
            .with_context(context.error_context())),
            Some(OutOfRange::Above) => Err(UserError::new(
                Identifier::ArgumentDateTooFar,
                "The given date is too far in the future.",
            )
            .with_parameter(parameter)
            .with_context(context.error_context())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepted_formats() {
        let ctx = ArgumentContext::new();
        let expected = DateTime::parse_from_rfc3339("2024-03-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(DateResolver.run("2024-03-01", &ctx).await.unwrap(), expected);
        assert_eq!(
            DateResolver.run("2024-03-01T00:00:00+00:00", &ctx).await.unwrap(),
            expected
        );
        let millis = expected.timestamp_millis().to_string();
        assert_eq!(DateResolver.run(&millis, &ctx).await.unwrap(), expected);
    }

    #[tokio::test]
    async fn invalid_and_out_of_range() {
        let ctx = ArgumentContext::new().minimum(0.0).maximum(1_000.0);
        assert_eq!(
            DateResolver.run("yesterday", &ctx).await.unwrap_err().identifier,
            Identifier::ArgumentDateError
        );
        assert_eq!(
            DateResolver.run("-1", &ctx).await.unwrap_err().identifier,
            Identifier::ArgumentDateTooEarly
        );
        assert_eq!(
            DateResolver.run("2024-01-01", &ctx).await.unwrap_err().identifier,
            Identifier::ArgumentDateTooFar
        );
        assert!(DateResolver.run("500", &ctx).await.is_ok());
    }
}
