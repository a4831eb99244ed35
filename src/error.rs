use chrono::NaiveDate;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failures raised by the gap-filling engine (`crate::series`).
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    /// `get` was called with `start > end`.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// An estimator was asked for a day outside its own validity.
    DateNotCovered { date: NaiveDate },
    /// The sample set does not satisfy the construction invariants.
    ConstructionInvariantViolation(String),
    /// Index resolution produced a result that contradicts the sorted samples.
    InternalInconsistency(String),
}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::InvalidRange { start, end } => {
                write!(f, "Invalid date range: start {start} is after end {end}.")
            }
            SeriesError::DateNotCovered { date } => {
                write!(f, "Estimator has no value for {date}.")
            }
            SeriesError::ConstructionInvariantViolation(msg) => {
                write!(f, "Invalid metric series: {msg}")
            }
            SeriesError::InternalInconsistency(msg) => {
                write!(f, "Internal inconsistency in metric series: {msg}")
            }
        }
    }
}

impl std::error::Error for SeriesError {}

impl From<SeriesError> for AppError {
    fn from(err: SeriesError) -> Self {
        let exit_code = match err {
            SeriesError::InvalidRange { .. } => 2,
            SeriesError::ConstructionInvariantViolation(_) => 3,
            SeriesError::DateNotCovered { .. } | SeriesError::InternalInconsistency(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_errors_map_to_exit_codes() {
        let d = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let range: AppError = SeriesError::InvalidRange { start: d, end: d }.into();
        assert_eq!(range.exit_code(), 2);

        let build: AppError = SeriesError::ConstructionInvariantViolation("too few".into()).into();
        assert_eq!(build.exit_code(), 3);
        assert!(build.to_string().contains("too few"));

        let internal: AppError = SeriesError::DateNotCovered { date: d }.into();
        assert_eq!(internal.exit_code(), 4);
    }
}
