use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::distribution::{normal_two_sided, student_t_two_sided};
use crate::data::model::{NumericColumn, Table};
use crate::error::CorrelationError;

// ---------------------------------------------------------------------------
// Correlation method
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Linear correlation.
    #[default]
    Pearson,
    /// Pearson correlation of average ranks.
    Spearman,
    /// Kendall tau-b.
    Kendall,
}

impl CorrelationMethod {
    pub const ALL: [CorrelationMethod; 3] = [Self::Pearson, Self::Spearman, Self::Kendall];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
            Self::Kendall => "kendall",
        }
    }

    /// Coefficient over pairwise-complete observations.
    /// Returns the coefficient and the number of observations used.
    pub fn coefficient(self, xs: &[f64], ys: &[f64]) -> (f64, usize) {
        let (xs, ys) = complete_pairs(xs, ys);
        let n = xs.len();
        if n < 2 {
            return (f64::NAN, n);
        }
        let r = match self {
            Self::Pearson => pearson(&xs, &ys),
            Self::Spearman => pearson(&rank(&xs), &rank(&ys)),
            Self::Kendall => kendall_tau_b(&xs, &ys),
        };
        (if r.is_nan() { r } else { r.clamp(-1.0, 1.0) }, n)
    }

    /// Two-sided p-value for a coefficient computed from `n` observations.
    pub fn p_value(self, coef: f64, n: usize) -> f64 {
        if coef.is_nan() || n < 3 {
            return f64::NAN;
        }
        if coef.abs() >= 1.0 {
            return 0.0;
        }
        let n = n as f64;
        match self {
            Self::Pearson | Self::Spearman => {
                let df = n - 2.0;
                let t = coef * (df / ((1.0 - coef) * (1.0 + coef))).sqrt();
                student_t_two_sided(t, df)
            }
            Self::Kendall => {
                let z = 3.0 * coef * (n * (n - 1.0)).sqrt() / (2.0 * (2.0 * n + 5.0)).sqrt();
                normal_two_sided(z)
            }
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CorrelationMethod {
    type Err = CorrelationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pearson" => Ok(Self::Pearson),
            "spearman" => Ok(Self::Spearman),
            "kendall" => Ok(Self::Kendall),
            _ => Err(CorrelationError::UnsupportedMethod(s.to_string())),
        }
    }
}

// Accept the same case-insensitive names as `FromStr`.
impl<'de> Deserialize<'de> for CorrelationMethod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

fn complete_pairs(xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    xs.iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .unzip()
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let len = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / len;
    let mean_y = ys.iter().sum::<f64>() / len;
    let mut num = 0.0;
    let mut denom_x = 0.0;
    let mut denom_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        num += dx * dy;
        denom_x += dx * dx;
        denom_y += dy * dy;
    }
    if denom_x == 0.0 || denom_y == 0.0 {
        return f64::NAN;
    }
    num / (denom_x.sqrt() * denom_y.sqrt())
}

/// Average ranks (1-based); ties share the mean of their positions.
fn rank(values: &[f64]) -> Vec<f64> {
    let mut pairs: Vec<(usize, f64)> = values.iter().cloned().enumerate().collect();
    pairs.sort_by(|a, b| a.1.total_cmp(&b.1));
    let mut ranks = vec![0.0; values.len()];
    let mut idx = 0;
    while idx < pairs.len() {
        let start = idx;
        let value = pairs[idx].1;
        while idx < pairs.len() && pairs[idx].1 == value {
            idx += 1;
        }
        let rank_value = (start + idx - 1) as f64 / 2.0 + 1.0;
        for &(original_idx, _) in &pairs[start..idx] {
            ranks[original_idx] = rank_value;
        }
    }
    ranks
}

fn kendall_tau_b(xs: &[f64], ys: &[f64]) -> f64 {
    let mut concordant = 0u64;
    let mut discordant = 0u64;
    let mut ties_x = 0u64;
    let mut ties_y = 0u64;
    for i in 0..xs.len() {
        for j in (i + 1)..xs.len() {
            let sx = xs[i].total_cmp(&xs[j]);
            let sy = ys[i].total_cmp(&ys[j]);
            match (sx, sy) {
                (Ordering::Equal, Ordering::Equal) => {}
                (Ordering::Equal, _) => ties_x += 1,
                (_, Ordering::Equal) => ties_y += 1,
                _ if sx == sy => concordant += 1,
                _ => discordant += 1,
            }
        }
    }
    let pairs = (concordant + discordant) as f64;
    let denom = ((pairs + ties_x as f64) * (pairs + ties_y as f64)).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (concordant as f64 - discordant as f64) / denom
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Square, symmetric matrix of coefficients indexed by numeric column names.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub method: CorrelationMethod,
    pub labels: Vec<String>,
    /// Row-major `n × n` coefficients.
    values: Vec<f64>,
    /// Row-major `n × n` pairwise-complete observation counts.
    counts: Vec<usize>,
}

impl CorrelationMatrix {
    /// Compute the matrix over the given columns.  Needs at least two.
    pub fn from_columns(
        columns: &[NumericColumn],
        method: CorrelationMethod,
    ) -> Result<Self, CorrelationError> {
        let n = columns.len();
        if n < 2 {
            return Err(CorrelationError::InsufficientNumericColumns { found: n });
        }

        let mut values = vec![f64::NAN; n * n];
        let mut counts = vec![0; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
            counts[i * n + i] = columns[i].values.iter().filter(|v| !v.is_nan()).count();
            for j in (i + 1)..n {
                let (coef, complete) = method.coefficient(&columns[i].values, &columns[j].values);
                values[i * n + j] = coef;
                values[j * n + i] = coef;
                counts[i * n + j] = complete;
                counts[j * n + i] = complete;
            }
        }

        Ok(CorrelationMatrix {
            method,
            labels: columns.iter().map(|c| c.name.clone()).collect(),
            values,
            counts,
        })
    }

    /// Number of rows (= columns).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.len() + col]
    }

    pub fn count(&self, row: usize, col: usize) -> usize {
        self.counts[row * self.len() + col]
    }

    /// Long-form listing in matrix order.
    ///
    /// * `exclude_self` drops the diagonal.
    /// * `exclude_dupe` keeps only the upper triangle, so each unordered
    ///   pair appears once with `col1` earlier in column order.
    pub fn pairs(&self, exclude_self: bool, exclude_dupe: bool) -> Vec<CorrelationPair> {
        let n = self.len();
        let mut out = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                if exclude_self && i == j {
                    continue;
                }
                if exclude_dupe && j < i {
                    continue;
                }
                let coef = self.get(i, j);
                let count = self.count(i, j);
                out.push(CorrelationPair {
                    col1: self.labels[i].clone(),
                    col2: self.labels[j].clone(),
                    coef,
                    p_value: self.method.p_value(coef, count),
                    n: count,
                });
            }
        }
        out
    }
}

/// Compute the correlation matrix over the numeric columns of `table`.
pub fn correlation_matrix(
    table: &Table,
    method: CorrelationMethod,
) -> Result<CorrelationMatrix, CorrelationError> {
    let columns = table.numeric_columns();
    let skipped = table.column_names.len() - columns.len();
    if skipped > 0 {
        log::debug!("Skipping {skipped} non-numeric column(s)");
    }
    CorrelationMatrix::from_columns(&columns, method)
}

// ---------------------------------------------------------------------------
// Long-form pairs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationPair {
    pub col1: String,
    pub col2: String,
    pub coef: f64,
    pub p_value: f64,
    /// Pairwise-complete observations.
    pub n: usize,
}

/// Sort ascending by p-value, `NaN` last.
pub fn sort_by_p_value(pairs: &mut [CorrelationPair]) {
    pairs.sort_by(|a, b| match (a.p_value.is_nan(), b.p_value.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.p_value.total_cmp(&b.p_value),
    });
}
