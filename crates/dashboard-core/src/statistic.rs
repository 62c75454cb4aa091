use serde::{Serialize, Serializer};
use std::fmt;

/// A derived descriptive statistic that may have no underlying data.
///
/// Means over zero usable values are [`Statistic::NoData`] rather than NaN.
/// Serialises to a JSON number or `null`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Statistic {
    Value(f64),
    NoData,
}

impl Statistic {
    /// Arithmetic mean of the present values; missing values are skipped.
    pub fn mean<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let (sum, count) = values
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));

        if count == 0 {
            Statistic::NoData
        } else {
            Statistic::Value(sum / count as f64)
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Statistic::Value(v) => Some(v),
            Statistic::NoData => None,
        }
    }

    pub fn is_no_data(self) -> bool {
        matches!(self, Statistic::NoData)
    }
}

impl From<Option<f64>> for Statistic {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Statistic::Value(v),
            _ => Statistic::NoData,
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Value(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            Statistic::NoData => f.write_str("no data"),
        }
    }
}

impl Serialize for Statistic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Statistic::Value(v) => serializer.serialize_f64(*v),
            Statistic::NoData => serializer.serialize_none(),
        }
    }
}
