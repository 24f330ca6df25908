use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single dated observation. `None` marks a gap, never a zero.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl Observation {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value: value.filter(|v| v.is_finite()) }
    }
}

/// Date-ordered observations of one macro variable (e.g. USD/ZMW, headline inflation).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IndicatorSeries {
    slug: String,
    points: Vec<Observation>,
}

impl IndicatorSeries {
    /// Builds a series, sorting by date and normalizing NaN/inf to gaps.
    pub fn new(slug: impl Into<String>, points: Vec<Observation>) -> Self {
        let mut points: Vec<Observation> = points
            .into_iter()
            .map(|p| Observation::new(p.date, p.value))
            .collect();
        // Stable sort keeps duplicate dates in caller order
        points.sort_by_key(|p| p.date);
        Self { slug: slug.into(), points }
    }

    /// Consecutive monthly observations starting at `start`.
    pub fn monthly(slug: impl Into<String>, start: NaiveDate, values: &[Option<f64>]) -> Self {
        let points = values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| {
                start
                    .checked_add_months(Months::new(i as u32))
                    .map(|date| Observation::new(date, *v))
            })
            .collect();
        Self::new(slug, points)
    }

    /// Same as [`IndicatorSeries::monthly`] for gap-free data.
    pub fn from_values(slug: impl Into<String>, start: NaiveDate, values: &[f64]) -> Self {
        let values: Vec<Option<f64>> = values.iter().map(|v| Some(*v)).collect();
        Self::monthly(slug, start, &values)
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Row values, gaps included.
    pub fn values(&self) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Values with gaps dropped.
    pub fn observed(&self) -> Vec<f64> {
        self.points.iter().filter_map(|p| p.value).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.points.last()
    }

    /// Value of the last row, which may be a gap.
    pub fn latest_value(&self) -> Option<f64> {
        self.latest().and_then(|p| p.value)
    }

    /// Last row that actually carries a value.
    pub fn last_observed(&self) -> Option<(NaiveDate, f64)> {
        self.points
            .iter()
            .rev()
            .find_map(|p| p.value.map(|v| (p.date, v)))
    }

    /// Rebuilds a series on the same dates with new row values.
    pub fn with_values(&self, slug: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        let points = self
            .points
            .iter()
            .zip(values)
            .map(|(p, v)| Observation::new(p.date, v))
            .collect();
        Self::new(slug, points)
    }
}

/// Traffic-light status, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Green,
    Amber,
    Red,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Green => "green",
            Band::Amber => "amber",
            Band::Red => "red",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metric values attached to a signal. Every field is optional because any of
/// them may be undefined on a short history.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct SignalMetrics {
    pub value: Option<f64>,
    pub mom: Option<f64>,
    pub yoy: Option<f64>,
    pub z_score: Option<f64>,
    pub ratio: Option<f64>,
}

/// Classification output handed to rendering code.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SignalReport {
    pub indicator: String,
    /// `None` when the inputs did not allow a classification.
    pub status: Option<Band>,
    pub commentary: String,
    pub confidence: Option<u8>,
    pub metrics: SignalMetrics,
}

impl SignalReport {
    pub fn unavailable(indicator: &str, metrics: SignalMetrics) -> Self {
        Self {
            indicator: indicator.to_string(),
            status: None,
            commentary: "Data unavailable: insufficient history to classify".to_string(),
            confidence: None,
            metrics,
        }
    }

    pub fn is_available(&self) -> bool {
        self.status.is_some()
    }
}
