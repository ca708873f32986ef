use thiserror::Error;

#[derive(Error, Debug)]
pub enum HorizonsError {
    #[error("HTTP ureq error: {0}")]
    UreqHttpError(#[from] ureq::Error),

    #[error("CSV decode error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid step size: {0}")]
    InvalidStepSize(String),

    #[error("Invalid quantity list: {0}")]
    InvalidQuantities(String),

    #[error("Invalid HORIZONS datetime: {0}")]
    InvalidDateTime(String),

    #[error("Ambiguous target designation; multiple HORIZONS records match")]
    AmbiguousTarget { listing: Vec<String> },

    #[error("Unable to determine the HORIZONS id for target: {0}")]
    UnresolvedTarget(String),

    #[error("Column not found in ephemeris table: {0}")]
    MissingColumn(String),

    #[error("Unable to parse value '{value}' in column {column}")]
    ColumnParse { column: String, value: String },

    #[error("Malformed ephemeris table: {0}")]
    MalformedTable(String),

    #[error("HORIZONS returned no ephemeris: {0}")]
    HorizonsMessage(String),

    #[error("System clock unavailable: {0}")]
    SystemClock(String),
}

impl PartialEq for HorizonsError {
    fn eq(&self, other: &Self) -> bool {
        use HorizonsError::*;
        match (self, other) {
            // Transport and decode errors are not comparable: equal if same variant
            (UreqHttpError(_), UreqHttpError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            (InvalidStepSize(a), InvalidStepSize(b)) => a == b,
            (InvalidQuantities(a), InvalidQuantities(b)) => a == b,
            (InvalidDateTime(a), InvalidDateTime(b)) => a == b,
            (AmbiguousTarget { listing: a }, AmbiguousTarget { listing: b }) => a == b,
            (UnresolvedTarget(a), UnresolvedTarget(b)) => a == b,
            (MissingColumn(a), MissingColumn(b)) => a == b,
            (
                ColumnParse {
                    column: c1,
                    value: v1,
                },
                ColumnParse {
                    column: c2,
                    value: v2,
                },
            ) => c1 == c2 && v1 == v2,
            (MalformedTable(a), MalformedTable(b)) => a == b,
            (HorizonsMessage(a), HorizonsMessage(b)) => a == b,
            (SystemClock(a), SystemClock(b)) => a == b,

            _ => false,
        }
    }
}
