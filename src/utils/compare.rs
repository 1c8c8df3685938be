use num::Num;
use std::cmp::Ordering;

/// Similarity between sparse vectors given as `(index, value)` iterators
/// sorted by ascending index.
pub trait Compare<N>
where
    N: Num + Copy,
{
    /// コサイン類似度
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    /// A zero-norm side scores 0.0.
    fn cosine_similarity(vec: impl Iterator<Item = (usize, N)>, other: impl Iterator<Item = (usize, N)>) -> f64;
}

#[derive(Debug)]
pub struct DefaultCompare;

impl<N> Compare<N> for DefaultCompare
where
    N: Num + Copy + Into<f64>,
{
    #[inline]
    fn cosine_similarity(vec: impl Iterator<Item = (usize, N)>, other: impl Iterator<Item = (usize, N)>) -> f64 {
        let mut a_it = vec.fuse();
        let mut b_it = other.fuse();
        let mut a_next = a_it.next();
        let mut b_next = b_it.next();
        let mut norm_a = 0_f64;
        let mut norm_b = 0_f64;
        let mut dot = 0_f64;
        while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
            let (va, vb): (f64, f64) = (va.into(), vb.into());
            match ia.cmp(&ib) {
                Ordering::Equal => {
                    norm_a += va * va;
                    norm_b += vb * vb;
                    dot += va * vb;
                    a_next = a_it.next();
                    b_next = b_it.next();
                }
                Ordering::Less => {
                    norm_a += va * va;
                    a_next = a_it.next();
                }
                Ordering::Greater => {
                    norm_b += vb * vb;
                    b_next = b_it.next();
                }
            }
        }
        while let Some((_, va)) = a_next { let va: f64 = va.into(); norm_a += va * va; a_next = a_it.next(); }
        while let Some((_, vb)) = b_next { let vb: f64 = vb.into(); norm_b += vb * vb; b_next = b_it.next(); }
        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            // rounding can push identical vectors just past 1.0
            (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
        }
    }
}
