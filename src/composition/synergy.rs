use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Symmetric pairwise player compatibility, indexed by request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynergyMatrix {
    values: Vec<Vec<f64>>,
}

impl SynergyMatrix {
    /// Matrix of `n` players where every off-diagonal pair starts at `fill`.
    pub fn uniform(n: usize, fill: f64) -> Self {
        let values = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 1.0 } else { fill }).collect())
            .collect();
        Self { values }
    }

    /// Build from explicit rows; the input must be square.
    pub fn from_rows(values: Vec<Vec<f64>>) -> Result<Self> {
        let n = values.len();
        if let Some(row) = values.iter().find(|row| row.len() != n) {
            return Err(EngineError::MatrixShape {
                expected: n,
                actual: row.len(),
            });
        }
        Ok(Self { values })
    }

    /// Set both `(i, j)` and `(j, i)`.
    pub fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        if i < self.len() && j < self.len() && i != j {
            self.values[i][j] = value;
            self.values[j][i] = value;
        }
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Mean over all unordered index pairs of the first `players` rows;
    /// `empty_default` when there are no pairs.
    pub fn mean_pairwise(&self, players: usize, empty_default: f64) -> f64 {
        let mut sum = 0.0;
        let mut pairs = 0usize;
        for i in 0..players {
            for j in (i + 1)..players {
                if let Some(v) = self.get(i, j) {
                    sum += v;
                    pairs += 1;
                }
            }
        }
        if pairs == 0 {
            empty_default
        } else {
            sum / pairs as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_has_unit_diagonal() {
        let m = SynergyMatrix::uniform(3, 0.7);
        assert_eq!(m.get(0, 0), Some(1.0));
        assert_eq!(m.get(1, 2), Some(0.7));
        assert_eq!(m.get(3, 0), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(SynergyMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5]]).is_err());
        assert!(SynergyMatrix::from_rows(vec![vec![1.0, 0.5], vec![0.5, 1.0]]).is_ok());
    }

    #[test]
    fn test_set_pair_is_symmetric() {
        let mut m = SynergyMatrix::uniform(3, 0.0);
        m.set_pair(0, 2, 0.9);
        assert_eq!(m.get(2, 0), Some(0.9));
        m.set_pair(1, 1, 0.2);
        assert_eq!(m.get(1, 1), Some(1.0));
    }

    #[test]
    fn test_mean_pairwise() {
        let m = SynergyMatrix::from_rows(vec![
            vec![1.0, 0.8, 0.6],
            vec![0.8, 1.0, 0.4],
            vec![0.6, 0.4, 1.0],
        ])
        .unwrap();
        assert!((m.mean_pairwise(3, 0.7) - 0.6).abs() < 1e-12);
        assert_eq!(m.mean_pairwise(1, 0.7), 0.7);
    }
}
