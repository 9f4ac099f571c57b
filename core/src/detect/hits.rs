use crate::error::HitParseError;
use serde::Serialize;

/// One row of the detector's `.dat` hit table, fields in column order.
///
/// `Default` is the all-zero placeholder row used when a frame produced no
/// detections.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Hit {
    pub top_hit_num: f64,
    /// Detected drift rate, Hz/s.
    pub drift_rate: f64,
    pub snr: f64,
    /// Detected frequency before drift correction, MHz.
    pub uncorrected_freq: f64,
    pub corrected_freq: f64,
    pub index: f64,
    pub freq_start: f64,
    pub freq_end: f64,
    pub sefd: f64,
    pub sefd_freq: f64,
    pub coarse_chan_num: f64,
    pub full_num_hits: f64,
}

impl Hit {
    pub const FIELDS: usize = 12;

    /// Builds a hit from whitespace-split numeric fields; short rows are
    /// zero-filled, extra fields ignored.
    fn from_fields(fields: &[f64]) -> Self {
        let get = |i: usize| fields.get(i).copied().unwrap_or(0.0);
        Self {
            top_hit_num: get(0),
            drift_rate: get(1),
            snr: get(2),
            uncorrected_freq: get(3),
            corrected_freq: get(4),
            index: get(5),
            freq_start: get(6),
            freq_end: get(7),
            sefd: get(8),
            sefd_freq: get(9),
            coarse_chan_num: get(10),
            full_num_hits: get(11),
        }
    }
}

/// Hit rows recovered for one frame. Never empty: an empty or absent parse
/// yields exactly one placeholder row with a recovered count of zero, so
/// downstream consumers can always read a first row.
#[derive(Debug, Clone, Serialize)]
pub struct HitTable {
    rows: Vec<Hit>,
    recovered: usize,
}

impl HitTable {
    /// Parses a detector `.dat` table. Lines starting with `#` are comments.
    pub fn parse(text: &str) -> Result<Self, HitParseError> {
        let mut rows = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = Vec::with_capacity(Hit::FIELDS);
            for field in line.split_whitespace() {
                let value = field.parse::<f64>().map_err(|_| HitParseError::BadField {
                    line: lineno + 1,
                    field: field.to_string(),
                })?;
                fields.push(value);
            }
            rows.push(Hit::from_fields(&fields));
        }
        Ok(Self::from_rows(rows))
    }

    /// Wraps parsed rows, substituting the placeholder when none exist.
    pub fn from_rows(rows: Vec<Hit>) -> Self {
        if rows.is_empty() {
            Self {
                rows: vec![Hit::default()],
                recovered: 0,
            }
        } else {
            let recovered = rows.len();
            Self { rows, recovered }
        }
    }

    /// Table for a frame with no detector output at all.
    pub fn placeholder() -> Self {
        Self::from_rows(Vec::new())
    }

    /// Number of real detections; zero for the placeholder table.
    pub fn recovered(&self) -> usize {
        self.recovered
    }

    pub fn rows(&self) -> &[Hit] {
        &self.rows
    }

    /// First row; total because the table is never empty.
    pub fn first(&self) -> &Hit {
        &self.rows[0]
    }
}
