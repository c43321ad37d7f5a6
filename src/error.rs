use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

/// Validation and resolution failures surfaced to the request boundary.
///
/// Two families, distinguished by `status_code()`: structural input-parsing
/// failures (422) and business-rule violations (400). `NoSearchMatch` is not
/// here on purpose — an empty search result is a descriptive response, not
/// an error.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("incorrect date format for {field}: '{value}' (expected YYYY-MM-DD HH:MM:SS)")]
    MalformedDate { field: &'static str, value: String },

    #[error("{field} {value} outside of data bounds ({first}: {last})")]
    DateOutOfBounds {
        field: &'static str,
        value: NaiveDateTime,
        first: NaiveDateTime,
        last: NaiveDateTime,
    },

    #[error("initial date {start} must be before final date {end}")]
    InvertedRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("none of the requested columns are present in the dataset: {requested:?}")]
    NoMatchingColumns { requested: Vec<String> },
}

impl QueryError {
    /// HTTP-equivalent status for the boundary payload: 422 for
    /// boundary-encoding failures, 400 for business-rule violations.
    pub fn status_code(&self) -> u16 {
        match self {
            QueryError::MalformedDate { .. } | QueryError::DateOutOfBounds { .. } => 422,
            QueryError::InvertedRange { .. } | QueryError::NoMatchingColumns { .. } => 400,
        }
    }

    /// Process exit code used by the CLI transport: 2 for 422-equivalents,
    /// 1 for 400-equivalents.
    pub fn exit_code(&self) -> i32 {
        match self.status_code() {
            422 => 2,
            _ => 1,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorBody {
                message: self.to_string(),
                status_code: self.status_code(),
            },
        }
    }
}

/// JSON error envelope: `{"error": {"message": ..., "status_code": ...}}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DATE_FORMAT;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let malformed = QueryError::MalformedDate {
            field: "start_date",
            value: "2019/03/03".to_string(),
        };
        let out_of_bounds = QueryError::DateOutOfBounds {
            field: "start_date",
            value: ts("2019-03-03 10:00:45"),
            first: ts("2019-06-27 00:00:00"),
            last: ts("2021-01-10 23:50:00"),
        };
        let inverted = QueryError::InvertedRange {
            start: ts("2020-03-03 10:00:45"),
            end: ts("2019-07-03 10:05:45"),
        };
        let no_columns = QueryError::NoMatchingColumns {
            requested: vec!["missing".to_string()],
        };

        assert_eq!(malformed.status_code(), 422);
        assert_eq!(out_of_bounds.status_code(), 422);
        assert_eq!(inverted.status_code(), 400);
        assert_eq!(no_columns.status_code(), 400);

        assert_eq!(malformed.exit_code(), 2);
        assert_eq!(inverted.exit_code(), 1);
    }

    #[test]
    fn test_out_of_bounds_message_reports_value_and_bounds() {
        let err = QueryError::DateOutOfBounds {
            field: "start_date",
            value: ts("2019-03-03 10:00:45"),
            first: ts("2019-06-27 00:00:00"),
            last: ts("2021-01-10 23:50:00"),
        };
        let message = err.to_string();
        assert!(message.contains("2019-03-03 10:00:45"));
        assert!(message.contains("2019-06-27 00:00:00"));
        assert!(message.contains("2021-01-10 23:50:00"));
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = QueryError::InvertedRange {
            start: ts("2020-03-03 10:00:45"),
            end: ts("2019-07-03 10:05:45"),
        };
        let json = serde_json::to_value(err.to_response()).unwrap();
        assert_eq!(json["error"]["status_code"], 400);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("must be before"));
    }
}
