use catalog_core::{Error, Result};

/// Dense row-major `rows × dim` table. Rows are L2-normalised on insert, so cosine
/// similarity against a unit query is a plain dot product.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingMatrix {
    dim: usize,
    data: Vec<f32>,
}

/// Scales `v` to unit length and returns its original norm. A zero vector is left as is.
pub fn l2_normalize(v: &mut [f32]) -> f32 {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        v.iter_mut().for_each(|x| *x /= norm);
    }
    norm
}

pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl EmbeddingMatrix {
    pub fn new(dim: usize) -> Self {
        Self { dim, data: Vec::new() }
    }

    pub fn from_rows(dim: usize, rows: Vec<Vec<f32>>) -> Result<Self> {
        let mut m = Self { dim, data: Vec::with_capacity(rows.len() * dim) };
        for row in rows {
            m.push(row)?;
        }
        Ok(m)
    }

    pub fn push(&mut self, mut row: Vec<f32>) -> Result<()> {
        if row.len() != self.dim {
            return Err(Error::EmbeddingProvider(format!(
                "expected a {}-dim vector, got {}",
                self.dim,
                row.len()
            )));
        }
        let norm = l2_normalize(&mut row);
        if !norm.is_normal() {
            return Err(Error::EmbeddingProvider("cannot store a zero-length vector".into()));
        }
        self.data.extend_from_slice(&row);
        Ok(())
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn rows(&self) -> usize {
        if self.dim == 0 { 0 } else { self.data.len() / self.dim }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn row(&self, i: usize) -> Option<&[f32]> {
        let start = i.checked_mul(self.dim)?;
        self.data.get(start..start + self.dim)
    }

    /// Dot product of `query` with row `i`; 0 for an out-of-range row.
    pub fn similarity(&self, query: &[f32], i: usize) -> f32 {
        self.row(i).map_or(0.0, |r| dot(query, r))
    }
}
