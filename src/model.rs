//! Logistic-regression scoring of feature vectors.

use std::io::Read;

use serde::Deserialize;

use crate::RelictError;

/// Exported regression weights: an intercept and one coefficient per
/// feature.
#[derive(Debug, Deserialize)]
pub struct ModelParams {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

#[derive(Debug)]
pub struct Model {
    params: ModelParams,
    threshold: f64,
}

/// Outcome of scoring one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Raw value of the linear regression.
    pub linear: f64,
    /// The linear value squashed through `1/(1+exp(-x))`.
    pub sigmoid: f64,
    /// 1 when `sigmoid` exceeds the threshold, else 0.
    pub decision: u8,
}

impl Model {
    pub fn new(params: ModelParams, threshold: f64) -> Self {
        Self { params, threshold }
    }

    /// Read the weights from their JSON form: an object with an `intercept`
    /// number and a `coefficients` number array.
    pub fn from_reader(weights: impl Read, threshold: f64) -> Result<Self, RelictError> {
        let params: ModelParams = serde_json::from_reader(weights)
            .map_err(|e| RelictError::Resource(format!("model weights: {e}")))?;
        Ok(Self::new(params, threshold))
    }

    pub fn coefficients_len(&self) -> usize {
        self.params.coefficients.len()
    }

    /// Score a feature vector. The vector must be exactly as long as the
    /// coefficient vector; a mismatch means the data bundle is inconsistent
    /// and classification cannot proceed.
    pub fn predict(&self, features: &[f64]) -> Result<Prediction, RelictError> {
        let coefficients = &self.params.coefficients;
        if features.len() != coefficients.len() {
            return Err(RelictError::Shape {
                expected: coefficients.len(),
                actual: features.len(),
            });
        }

        let mut linear = self.params.intercept;
        for (feature, coefficient) in features.iter().zip(coefficients) {
            linear += feature * coefficient;
        }
        let sigmoid = 1.0 / (1.0 + (-linear).exp());
        let decision = u8::from(sigmoid > self.threshold);
        Ok(Prediction { linear, sigmoid, decision })
    }
}
