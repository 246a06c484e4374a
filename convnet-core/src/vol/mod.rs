// convnet-core/src/vol/mod.rs

//! The volume type: a dense 3-D array of activations plus a gradient buffer of the same shape.

pub mod augment;
pub mod create;

use crate::nn::attributes::{AttrValue, Attributes};
use std::fmt;

/// Width, height and depth of a [`Vol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub sx: usize,
    pub sy: usize,
    pub depth: usize,
}

impl Shape {
    pub fn new(sx: usize, sy: usize, depth: usize) -> Self {
        Shape { sx, sy, depth }
    }

    /// Number of cells, `sx * sy * depth`.
    pub fn len(&self) -> usize {
        self.sx * self.sy * self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_array(&self) -> [usize; 3] {
        [self.sx, self.sy, self.depth]
    }

    /// Row-major flat index of `(x, y, d)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize, d: usize) -> usize {
        ((self.sx * y) + x) * self.depth + d
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.sx, self.sy, self.depth)
    }
}

/// A 3-D volume of values `w` and their gradients `dw`.
///
/// Both buffers always hold exactly `sx * sy * depth` elements; the fields are private so
/// the only way to touch them is through slices, which cannot change their length.
/// Out-of-range indices panic.
///
/// `clone()` copies the gradient along with the values; [`Vol::clone_values`] is the copy
/// taken at a step boundary, with a fresh zeroed gradient.
#[derive(Clone, PartialEq)]
pub struct Vol {
    shape: Shape,
    w: Vec<f64>,
    dw: Vec<f64>,
}

impl Vol {
    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn sx(&self) -> usize {
        self.shape.sx
    }

    pub fn sy(&self) -> usize {
        self.shape.sy
    }

    pub fn depth(&self) -> usize {
        self.shape.depth
    }

    pub fn len(&self) -> usize {
        self.w.len()
    }

    pub fn is_empty(&self) -> bool {
        self.w.is_empty()
    }

    pub fn w(&self) -> &[f64] {
        &self.w
    }

    pub fn w_mut(&mut self) -> &mut [f64] {
        &mut self.w
    }

    pub fn dw(&self) -> &[f64] {
        &self.dw
    }

    pub fn dw_mut(&mut self) -> &mut [f64] {
        &mut self.dw
    }

    /// Borrows values and gradients at the same time.
    pub fn split_mut(&mut self) -> (&mut [f64], &mut [f64]) {
        (&mut self.w, &mut self.dw)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, d: usize) -> f64 {
        self.w[self.shape.index(x, y, d)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, d: usize, v: f64) {
        let ix = self.shape.index(x, y, d);
        self.w[ix] = v;
    }

    #[inline]
    pub fn add(&mut self, x: usize, y: usize, d: usize, v: f64) {
        let ix = self.shape.index(x, y, d);
        self.w[ix] += v;
    }

    #[inline]
    pub fn get_grad(&self, x: usize, y: usize, d: usize) -> f64 {
        self.dw[self.shape.index(x, y, d)]
    }

    #[inline]
    pub fn set_grad(&mut self, x: usize, y: usize, d: usize, v: f64) {
        let ix = self.shape.index(x, y, d);
        self.dw[ix] = v;
    }

    #[inline]
    pub fn add_grad(&mut self, x: usize, y: usize, d: usize, v: f64) {
        let ix = self.shape.index(x, y, d);
        self.dw[ix] += v;
    }

    /// Same shape, all values and gradients zero.
    pub fn clone_and_zero(&self) -> Vol {
        Vol::zeros(self.shape.sx, self.shape.sy, self.shape.depth)
    }

    /// Deep copy of the values with a fresh, zeroed gradient buffer.
    pub fn clone_values(&self) -> Vol {
        Vol {
            shape: self.shape,
            w: self.w.clone(),
            dw: vec![0.0; self.dw.len()],
        }
    }

    /// `w += other.w`, element-wise.
    pub fn add_from(&mut self, other: &Vol) {
        self.add_from_scaled(other, 1.0);
    }

    /// `w += a * other.w`, element-wise.
    pub fn add_from_scaled(&mut self, other: &Vol, a: f64) {
        assert_eq!(self.w.len(), other.w.len(), "add_from_scaled: length mismatch");
        for (dst, src) in self.w.iter_mut().zip(other.w.iter()) {
            *dst += a * src;
        }
    }

    pub fn set_const(&mut self, a: f64) {
        self.w.fill(a);
    }

    pub fn zero_grad(&mut self) {
        self.dw.fill(0.0);
    }

    /// Index of the largest value; the first one wins on ties.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, &v) in self.w.iter().enumerate().skip(1) {
            if v > self.w[best] {
                best = i;
            }
        }
        best
    }

    /// Geometry and values; gradients are not dumped.
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("sx".to_string(), AttrValue::Int(self.shape.sx));
        attrs.insert("sy".to_string(), AttrValue::Int(self.shape.sy));
        attrs.insert("depth".to_string(), AttrValue::Int(self.shape.depth));
        attrs.insert("w".to_string(), AttrValue::Floats(self.w.clone()));
        attrs
    }
}

impl fmt::Debug for Vol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const PREVIEW: usize = 8;
        let head: Vec<f64> = self.w.iter().take(PREVIEW).copied().collect();
        f.debug_struct("Vol")
            .field("shape", &format_args!("{}", self.shape))
            .field("w", &head)
            .field("truncated", &(self.w.len() > PREVIEW))
            .finish()
    }
}

#[cfg(test)]
#[path = "vol_test.rs"]
mod tests;
