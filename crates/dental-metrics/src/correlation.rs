//! Pearson correlation between dataset fields.

use serde::{Deserialize, Serialize};

use dental_model::{Dataset, Field, UndefinedCorrelation, UndefinedReason};

use crate::stats::{is_constant, mean};

/// Pearson correlation of `a` and `b` over the dataset.
///
/// Undefined rather than zero when either field is constant (zero variance)
/// or the dataset has fewer than two records. A non-constant field correlates
/// with itself at exactly `1.0`.
pub fn correlation(dataset: &Dataset, a: Field, b: Field) -> Result<f64, UndefinedCorrelation> {
    let xs = dataset.column(a);
    let ys = dataset.column(b);
    pearson(&xs, &ys).map_err(|reason| {
        let reason = match reason {
            PearsonUndefined::Empty => UndefinedReason::EmptyDataset,
            PearsonUndefined::TooFew => UndefinedReason::InsufficientData,
            PearsonUndefined::ConstantX => UndefinedReason::ZeroVariance { field: a },
            PearsonUndefined::ConstantY => UndefinedReason::ZeroVariance { field: b },
        };
        UndefinedCorrelation { a, b, reason }
    })
    .map(|value| if a == b { 1.0 } else { value })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PearsonUndefined {
    Empty,
    TooFew,
    ConstantX,
    ConstantY,
}

fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64, PearsonUndefined> {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return Err(PearsonUndefined::Empty);
    }
    if n < 2 {
        return Err(PearsonUndefined::TooFew);
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    if is_constant(xs) {
        return Err(PearsonUndefined::ConstantX);
    }
    if is_constant(ys) {
        return Err(PearsonUndefined::ConstantY);
    }
    let (xs, ys) = (unit_scaled(xs), unit_scaled(ys));
    let (Some(mean_x), Some(mean_y)) = (mean(&xs), mean(&ys)) else {
        return Err(PearsonUndefined::Empty);
    };
    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (x, y) in xs.iter().zip(&ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return Err(PearsonUndefined::ConstantX);
    }
    if syy == 0.0 {
        return Err(PearsonUndefined::ConstantY);
    }
    let r = sxy / (sxx.sqrt() * syy.sqrt());
    Ok(r.clamp(-1.0, 1.0))
}

/// Divide by the largest magnitude so squared deviations stay finite.
fn unit_scaled(values: &[f64]) -> Vec<f64> {
    let peak = values.iter().fold(0.0_f64, |peak, value| peak.max(value.abs()));
    if peak > 0.0 && peak.is_finite() {
        values.iter().map(|value| value / peak).collect()
    } else {
        values.to_vec()
    }
}

/// Symmetric correlation matrix over a fixed field set.
///
/// Cells are `None` where the correlation is undefined; a constant field has
/// an undefined diagonal as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub fields: Vec<Field>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: Field, b: Field) -> Option<f64> {
        let row = self.fields.iter().position(|field| *field == a)?;
        let col = self.fields.iter().position(|field| *field == b)?;
        self.cells[row][col]
    }
}

/// Correlations of every field pair, plus the undefined pairs it skipped.
pub fn correlation_matrix(
    dataset: &Dataset,
    fields: &[Field],
) -> (CorrelationMatrix, Vec<UndefinedCorrelation>) {
    let size = fields.len();
    let mut cells = vec![vec![None; size]; size];
    let mut undefined = Vec::new();
    for row in 0..size {
        for col in row..size {
            match correlation(dataset, fields[row], fields[col]) {
                Ok(value) => {
                    cells[row][col] = Some(value);
                    cells[col][row] = Some(value);
                }
                Err(error) => {
                    if row != col {
                        undefined.push(error);
                    }
                }
            }
        }
    }
    let matrix = CorrelationMatrix {
        fields: fields.to_vec(),
        cells,
    };
    (matrix, undefined)
}
