// convnet-core/src/vol/augment.rs

use crate::vol::Vol;
use rand::Rng;

impl Vol {
    /// Crops a `crop x crop` window out of the volume and optionally mirrors it left/right.
    ///
    /// `offset` is the `(dx, dy)` position of the window in this volume; when it is `None`
    /// a position is drawn uniformly so that the window fits. Cells of the window that fall
    /// outside the volume stay zero. When the window covers the whole volume unchanged the
    /// values are copied as they are.
    pub fn augment<R: Rng + ?Sized>(
        &self,
        crop: usize,
        offset: Option<(usize, usize)>,
        flip_lr: bool,
        rng: &mut R,
    ) -> Vol {
        let (dx, dy) = offset.unwrap_or_else(|| {
            let dx = rng.gen_range(0..=self.sx().saturating_sub(crop));
            let dy = rng.gen_range(0..=self.sy().saturating_sub(crop));
            (dx, dy)
        });

        let mut cropped = if crop != self.sx() || crop != self.sy() || dx != 0 || dy != 0 {
            let mut w = Vol::zeros(crop, crop, self.depth());
            for x in 0..crop {
                for y in 0..crop {
                    let (ox, oy) = (x + dx, y + dy);
                    if ox >= self.sx() || oy >= self.sy() {
                        continue;
                    }
                    for d in 0..self.depth() {
                        w.set(x, y, d, self.get(ox, oy, d));
                    }
                }
            }
            w
        } else {
            self.clone_values()
        };

        if flip_lr {
            let mut flipped = cropped.clone_and_zero();
            let sx = cropped.sx();
            for x in 0..sx {
                for y in 0..cropped.sy() {
                    for d in 0..cropped.depth() {
                        flipped.set(x, y, d, cropped.get(sx - x - 1, y, d));
                    }
                }
            }
            cropped = flipped;
        }
        cropped
    }
}
