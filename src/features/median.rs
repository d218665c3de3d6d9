//! Sliding median filter with reflect boundary
//!
//! Out-of-range positions mirror the signal including the edge sample
//! (`d c b a | a b c d | d c b a`), which keeps constant signals constant right up to
//! the edges.

use std::cmp::Ordering;

/// Map a possibly out-of-range index into `0..len` by half-sample reflection
fn reflect_index(idx: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let mut j = idx.rem_euclid(period);
    if j >= len as isize {
        j = period - 1 - j;
    }
    j as usize
}

/// Apply a centred median filter of `window` samples
///
/// `window` values of 0 or 1 return the input unchanged. Even windows take the upper
/// median of the reflected neighbourhood.
pub fn median_filter(input: &[f32], window: usize) -> Vec<f32> {
    if window <= 1 || input.len() <= 1 {
        return input.to_vec();
    }

    let len = input.len();
    let half = (window / 2) as isize;
    let mut scratch = Vec::with_capacity(window);
    let mut output = Vec::with_capacity(len);

    for i in 0..len as isize {
        scratch.clear();
        for offset in -half..(window as isize - half) {
            scratch.push(input[reflect_index(i + offset, len)]);
        }
        let mid = scratch.len() / 2;
        let (_, median, _) = scratch
            .select_nth_unstable_by(mid, |a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        output.push(*median);
    }

    output
}
