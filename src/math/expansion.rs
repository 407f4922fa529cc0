//! Expansion-based exact floating-point arithmetic.
//!
//! An *expansion* is a sequence of non-overlapping `f64` components, stored
//! in order of increasing magnitude, whose exact sum is the represented
//! value. Every operation here is error-free: rounding error is never
//! discarded, it is captured as additional low-order components of the
//! output. The adaptive predicates in [`super::predicates`] are built
//! entirely from these primitives.
//!
//! Output buffers are fixed-capacity slices sized by the caller to the
//! worst case of the expression depth in use; the functions return the
//! number of components written after zero elimination.

/// `2^27 + 1`, used to split a double's mantissa into two 26-bit halves.
const SPLITTER: f64 = 134_217_729.0;

/// Exact error-free transformation of `a + b` into `(err, sum)`.
#[inline]
#[must_use]
pub fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let sum = a + b;
    let b_virt = sum - a;
    let a_virt = sum - b_virt;
    let b_round = b - b_virt;
    let a_round = a - a_virt;
    (a_round + b_round, sum)
}

/// Exact error-free transformation of `a + b`, requiring `|a| >= |b|`.
#[inline]
#[must_use]
pub fn fast_two_sum(a: f64, b: f64) -> (f64, f64) {
    let sum = a + b;
    let b_virt = sum - a;
    (b - b_virt, sum)
}

/// Exact error-free transformation of `a - b` into `(err, diff)`.
#[inline]
#[must_use]
pub fn two_diff(a: f64, b: f64) -> (f64, f64) {
    let diff = a - b;
    let b_virt = a - diff;
    let a_virt = diff + b_virt;
    let b_round = b_virt - b;
    let a_round = a - a_virt;
    (a_round + b_round, diff)
}

/// Round-off component of `a - b` given the already-rounded `diff = a - b`.
#[inline]
#[must_use]
pub fn two_diff_tail(a: f64, b: f64, diff: f64) -> f64 {
    let b_virt = a - diff;
    let a_virt = diff + b_virt;
    let b_round = b_virt - b;
    let a_round = a - a_virt;
    a_round + b_round
}

/// Splits `a` into two non-overlapping halves `(hi, lo)` with `a = hi + lo`.
#[inline]
#[must_use]
pub fn split(a: f64) -> (f64, f64) {
    let c = SPLITTER * a;
    let a_big = c - a;
    let hi = c - a_big;
    (hi, a - hi)
}

/// Exact 2-component expansion `(err, prod)` of `a * b`.
#[inline]
#[must_use]
pub fn two_product(a: f64, b: f64) -> (f64, f64) {
    let prod = a * b;
    let (a_hi, a_lo) = split(a);
    let (b_hi, b_lo) = split(b);
    let err1 = prod - a_hi * b_hi;
    let err2 = err1 - a_lo * b_hi;
    let err3 = err2 - a_hi * b_lo;
    (a_lo * b_lo - err3, prod)
}

/// Like [`two_product`] with `b` already split into `(b_hi, b_lo)`.
#[inline]
#[must_use]
pub fn two_product_presplit(a: f64, b: f64, b_hi: f64, b_lo: f64) -> (f64, f64) {
    let prod = a * b;
    let (a_hi, a_lo) = split(a);
    let err1 = prod - a_hi * b_hi;
    let err2 = err1 - a_lo * b_hi;
    let err3 = err2 - a_hi * b_lo;
    (a_lo * b_lo - err3, prod)
}

/// Exact 2-component expansion `(err, sq)` of `a * a`.
///
/// Cheaper than [`two_product`]: one split instead of two.
#[inline]
#[must_use]
pub fn square(a: f64) -> (f64, f64) {
    let sq = a * a;
    let (hi, lo) = split(a);
    let err1 = sq - hi * hi;
    let err3 = err1 - (hi + hi) * lo;
    (lo * lo - err3, sq)
}

/// Exact 3-component sum of the 2-component expansion `(a1, a0)` and `b`,
/// returned in order of increasing magnitude.
#[inline]
#[must_use]
pub fn two_one_sum(a1: f64, a0: f64, b: f64) -> [f64; 3] {
    let (x0, i) = two_sum(a0, b);
    let (x1, x2) = two_sum(a1, i);
    [x0, x1, x2]
}

/// Exact 3-component difference of the 2-component expansion `(a1, a0)`
/// and `b`, returned in order of increasing magnitude.
#[inline]
#[must_use]
pub fn two_one_diff(a1: f64, a0: f64, b: f64) -> [f64; 3] {
    let (x0, i) = two_diff(a0, b);
    let (x1, x2) = two_sum(a1, i);
    [x0, x1, x2]
}

/// Exact 4-component sum of two 2-component expansions.
#[inline]
#[must_use]
pub fn two_two_sum(a1: f64, a0: f64, b1: f64, b0: f64) -> [f64; 4] {
    let [x0, lo, j] = two_one_sum(a1, a0, b0);
    let [x1, x2, x3] = two_one_sum(j, lo, b1);
    [x0, x1, x2, x3]
}

/// Exact 4-component difference of two 2-component expansions.
#[inline]
#[must_use]
pub fn two_two_diff(a1: f64, a0: f64, b1: f64, b0: f64) -> [f64; 4] {
    let [x0, lo, j] = two_one_diff(a1, a0, b0);
    let [x1, x2, x3] = two_one_diff(j, lo, b1);
    [x0, x1, x2, x3]
}

/// Fast, inexact single-float approximation of an expansion's value.
#[inline]
#[must_use]
pub fn estimate(e: &[f64]) -> f64 {
    e.iter().sum()
}

/// Merge consumption order: take the `e` component while `|e| <= |f|`.
#[inline]
fn e_first(enow: f64, fnow: f64) -> bool {
    (fnow > enow) == (fnow > -enow)
}

/// Exact sum of two zero-eliminated expansions, written zero-eliminated
/// into `h`. Returns the number of components in `h`.
///
/// `h` must not alias either input and needs capacity `e.len() + f.len()`.
/// Both inputs must be non-empty (a zero expansion is the 1-term `[0.0]`).
pub fn fast_expansion_sum_zeroelim(e: &[f64], f: &[f64], h: &mut [f64]) -> usize {
    let mut ei = 0;
    let mut fi = 0;
    let mut q = if e_first(e[0], f[0]) {
        ei = 1;
        e[0]
    } else {
        fi = 1;
        f[0]
    };
    let mut hn = 0;

    if ei < e.len() && fi < f.len() {
        // First combination may not satisfy the |a| >= |b| precondition of
        // two_sum's cheap form the other way around, hence fast_two_sum
        // with the incoming component as the large operand.
        let (err, sum) = if e_first(e[ei], f[fi]) {
            let r = fast_two_sum(e[ei], q);
            ei += 1;
            r
        } else {
            let r = fast_two_sum(f[fi], q);
            fi += 1;
            r
        };
        q = sum;
        if err != 0.0 {
            h[hn] = err;
            hn += 1;
        }
        while ei < e.len() && fi < f.len() {
            let (err, sum) = if e_first(e[ei], f[fi]) {
                let r = two_sum(q, e[ei]);
                ei += 1;
                r
            } else {
                let r = two_sum(q, f[fi]);
                fi += 1;
                r
            };
            q = sum;
            if err != 0.0 {
                h[hn] = err;
                hn += 1;
            }
        }
    }
    while ei < e.len() {
        let (err, sum) = two_sum(q, e[ei]);
        ei += 1;
        q = sum;
        if err != 0.0 {
            h[hn] = err;
            hn += 1;
        }
    }
    while fi < f.len() {
        let (err, sum) = two_sum(q, f[fi]);
        fi += 1;
        q = sum;
        if err != 0.0 {
            h[hn] = err;
            hn += 1;
        }
    }
    if q != 0.0 || hn == 0 {
        h[hn] = q;
        hn += 1;
    }
    hn
}

/// Exact product of a zero-eliminated expansion and a single float,
/// written zero-eliminated into `h`. Returns the component count.
///
/// `h` must not alias `e` and needs capacity `2 * e.len()`.
pub fn scale_expansion_zeroelim(e: &[f64], b: f64, h: &mut [f64]) -> usize {
    let (b_hi, b_lo) = split(b);
    let (err, prod) = two_product_presplit(e[0], b, b_hi, b_lo);
    let mut q = prod;
    let mut hn = 0;
    if err != 0.0 {
        h[hn] = err;
        hn += 1;
    }
    for &enow in &e[1..] {
        let (p0, p1) = two_product_presplit(enow, b, b_hi, b_lo);
        let (err, sum) = two_sum(q, p0);
        if err != 0.0 {
            h[hn] = err;
            hn += 1;
        }
        let (err, big) = fast_two_sum(p1, sum);
        q = big;
        if err != 0.0 {
            h[hn] = err;
            hn += 1;
        }
    }
    if q != 0.0 || hn == 0 {
        h[hn] = q;
        hn += 1;
    }
    hn
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn two_sum_exact_when_no_rounding() {
        let (err, sum) = two_sum(1.5, 0.25);
        assert_eq!(sum, 1.75);
        assert_eq!(err, 0.0);
    }

    #[test]
    fn two_sum_captures_rounding_error() {
        // 1.0 + 2^-60 rounds to 1.0; the tail must carry the 2^-60 exactly.
        let tiny = (2.0_f64).powi(-60);
        let (err, sum) = two_sum(1.0, tiny);
        assert_eq!(sum, 1.0);
        assert_eq!(err, tiny);
    }

    #[test]
    fn two_diff_captures_cancellation() {
        let a = 1.0 + (2.0_f64).powi(-52);
        let (err, diff) = two_diff(a, 1.0);
        assert_eq!(diff + err, (2.0_f64).powi(-52));
    }

    #[test]
    fn split_halves_recombine() {
        let a = std::f64::consts::PI;
        let (hi, lo) = split(a);
        assert_eq!(hi + lo, a);
    }

    #[test]
    fn two_product_is_exact() {
        // (1 + 2^-30)^2 = 1 + 2^-29 + 2^-60 needs 61 mantissa bits; the
        // rounded product drops the 2^-60, which must land in the tail.
        let a = 1.0 + (2.0_f64).powi(-30);
        let (err, prod) = two_product(a, a);
        assert_eq!(prod, 1.0 + (2.0_f64).powi(-29));
        assert_eq!(err, (2.0_f64).powi(-60));
    }

    #[test]
    fn square_matches_two_product() {
        let a = 1.0 + (2.0_f64).powi(-30);
        let (perr, prod) = two_product(a, a);
        let (serr, sq) = square(a);
        assert_eq!(prod, sq);
        assert_eq!(perr, serr);
    }

    #[test]
    fn two_two_diff_represents_exact_difference() {
        let x = two_two_diff(1.0, (2.0_f64).powi(-60), 1.0, -(2.0_f64).powi(-60));
        let nonzero: Vec<f64> = x.iter().copied().filter(|&v| v != 0.0).collect();
        assert_eq!(nonzero, vec![(2.0_f64).powi(-59)]);
    }

    #[test]
    fn expansion_sum_merges_and_eliminates_zeros() {
        let e = [(2.0_f64).powi(-60), 1.0];
        let f = [-(2.0_f64).powi(-60), 2.0];
        let mut h = [0.0; 4];
        let n = fast_expansion_sum_zeroelim(&e, &f, &mut h);
        assert_eq!(&h[..n], &[3.0]);
    }

    #[test]
    fn expansion_sum_of_zero_expansions() {
        let e = [0.0];
        let f = [0.0];
        let mut h = [0.0; 2];
        let n = fast_expansion_sum_zeroelim(&e, &f, &mut h);
        assert_eq!(n, 1);
        assert_eq!(h[0], 0.0);
    }

    #[test]
    fn scale_expansion_by_power_of_two_is_lossless() {
        let e = [(2.0_f64).powi(-55), 1.0];
        let mut h = [0.0; 4];
        let n = scale_expansion_zeroelim(&e, 4.0, &mut h);
        assert_eq!(&h[..n], &[(2.0_f64).powi(-53), 4.0]);
    }

    #[test]
    fn estimate_sums_components() {
        assert_eq!(estimate(&[0.25, 0.5, 1.0]), 1.75);
    }
}
