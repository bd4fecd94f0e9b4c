use crate::core::utils::geometry::{Offset, Rect};
use rand::prelude::*;

/// Picks one offset uniformly; an empty direction set yields the identity offset.
pub fn choose_offset(offsets: &[Offset], rng: &mut impl Rng) -> Offset {
    offsets.choose(rng).copied().unwrap_or(Offset::ZERO)
}

/// A uniformly sized rectangle placed uniformly inside a `width × height` grid.
///
/// Width is drawn from `[1, width]`, height from `[1, height]`, and the origin so that the
/// rectangle fits.
pub fn random_rect(width: i32, height: i32, rng: &mut impl Rng) -> Option<Rect> {
    if width <= 0 || height <= 0 {
        return None;
    }
    let w = rng.gen_range(1..=width);
    let h = rng.gen_range(1..=height);
    let x = rng.gen_range(0..=width - w);
    let y = rng.gen_range(0..=height - h);
    Some(Rect::new(x, y, w, h))
}
