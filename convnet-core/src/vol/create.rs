// convnet-core/src/vol/create.rs

use crate::error::ConvNetError;
use crate::vol::{Shape, Vol};
use rand::Rng;
use rand_distr::StandardNormal;

impl Vol {
    /// Creates a volume of the given dimensions with every value set to `c`.
    ///
    /// Dimensions are expected to be at least 1; use [`Vol::from_shape_vec`] when they come
    /// from untrusted input.
    pub fn full(sx: usize, sy: usize, depth: usize, c: f64) -> Vol {
        let shape = Shape::new(sx, sy, depth);
        let n = shape.len();
        Vol {
            shape,
            w: vec![c; n],
            dw: vec![0.0; n],
        }
    }

    pub fn zeros(sx: usize, sy: usize, depth: usize) -> Vol {
        Vol::full(sx, sy, depth, 0.0)
    }

    /// Creates a volume filled with Gaussian noise of standard deviation `sqrt(1 / n)`,
    /// `n` being the number of cells. Used to initialise every filter.
    ///
    /// Dimensions must be at least 1.
    pub fn random<R: Rng + ?Sized>(sx: usize, sy: usize, depth: usize, rng: &mut R) -> Vol {
        let shape = Shape::new(sx, sy, depth);
        let n = shape.len();
        let scale = (1.0 / n as f64).sqrt();
        let w = (0..n)
            .map(|_| rng.sample::<f64, _>(StandardNormal) * scale)
            .collect();
        Vol {
            shape,
            w,
            dw: vec![0.0; n],
        }
    }

    /// Wraps a flat array as a `1 x 1 x len` volume.
    pub fn from_vec(values: Vec<f64>) -> Vol {
        let n = values.len();
        Vol {
            shape: Shape::new(1, 1, n),
            w: values,
            dw: vec![0.0; n],
        }
    }

    /// Wraps an already laid out array with explicit dimensions.
    ///
    /// # Errors
    /// Returns `ConvNetError::VolCreationError` if a dimension is 0 or
    /// `values.len() != sx * sy * depth`.
    pub fn from_shape_vec(
        sx: usize,
        sy: usize,
        depth: usize,
        values: Vec<f64>,
    ) -> Result<Vol, ConvNetError> {
        let shape = Shape::new(sx, sy, depth);
        if shape.is_empty() || values.len() != shape.len() {
            return Err(ConvNetError::VolCreationError {
                data_len: values.len(),
                shape: shape.as_array(),
            });
        }
        let n = values.len();
        Ok(Vol {
            shape,
            w: values,
            dw: vec![0.0; n],
        })
    }
}

impl From<Vec<f64>> for Vol {
    fn from(values: Vec<f64>) -> Self {
        Vol::from_vec(values)
    }
}

impl From<&[f64]> for Vol {
    fn from(values: &[f64]) -> Self {
        Vol::from_vec(values.to_vec())
    }
}
