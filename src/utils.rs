use std::fmt;

/// Count, range and mean of a value column, ignoring missing values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueSummary {
    pub count: usize,
    pub valid: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl ValueSummary {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut count = 0;
        let mut valid = 0;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for value in values {
            count += 1;
            if let Some(v) = value.filter(|v| !v.is_nan()) {
                valid += 1;
                sum += v;
                min = min.min(v);
                max = max.max(v);
            }
        }

        if valid == 0 {
            return Self {
                count,
                valid,
                min: None,
                max: None,
                mean: None,
            };
        }

        Self {
            count,
            valid,
            min: Some(min),
            max: Some(max),
            mean: Some(sum / valid as f64),
        }
    }

    pub fn valid_fraction(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.valid as f64 / self.count as f64
        }
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| format!("{:.4}", v))
}

impl fmt::Display for ValueSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Valid pixels: {} / {} ({:.1}%), Min: {}, Max: {}, Mean: {}",
            self.valid,
            self.count,
            100.0 * self.valid_fraction(),
            fmt_opt(self.min),
            fmt_opt(self.max),
            fmt_opt(self.mean),
        )
    }
}
