use crate::prelude::*;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The largest bucket window supported by the signed-digit recoding.
pub const MAX_WINDOW: usize = 16;

/// Return the bucket window width used for `size` scalar-point pairs.
///
/// The width grows roughly as `ln(size)`, which balances bucket
/// accumulation against the final per-window aggregation.
pub fn optimal_window(size: usize) -> usize {
    if size < 32 {
        3
    } else {
        let ln_size = (ark_std::log2(size) as usize) * 69 / 100;
        (ln_size + 2).min(MAX_WINDOW)
    }
}

/// Convert the scalar into a vector of signed digits in radix `2^w`,
/// each within `[-2^w/2, 2^w/2)`, least significant digit first.
pub fn scalar_to_radix_2_power_w<S: Scalar>(scalar: &S, w: usize) -> Vec<i64> {
    if scalar.is_zero() {
        return vec![0i64];
    }
    let scalar64 = scalar.get_little_endian_u64();

    let radix: u64 = 1 << (w as u64);
    let window_mask: u64 = radix - 1;

    let mut carry = 0u64;
    let mut digits = vec![];

    let mut i = 0;
    loop {
        // Construct a buffer of bits of the scalar, starting at `bit_offset`.
        let bit_offset = i * w;
        let u64_idx = bit_offset / 64;
        let bit_idx = bit_offset % 64;
        if u64_idx >= scalar64.len() {
            digits.push(carry as i64);
            break;
        }
        let is_last = u64_idx == scalar64.len() - 1;

        let bit_buf = if bit_idx < 64 - w || is_last {
            scalar64[u64_idx] >> (bit_idx as u64)
        } else {
            (scalar64[u64_idx] >> bit_idx) | (scalar64[1 + u64_idx] << (64 - bit_idx))
        };

        // coef is in [0, 2^w]
        let coef = carry + (bit_buf & window_mask);

        // Recenter coefficients from [0,2^w) to [-2^w/2, 2^w/2)
        carry = (coef + (radix / 2)) >> w;
        digits.push((coef as i64) - ((carry << w) as i64));
        i += 1;
    }

    while digits.len() > 1 && digits.last() == Some(&0) {
        digits.pop();
    }
    digits
}

/// Run the pippenger algorithm with a window chosen from the input size.
pub fn pippenger<G: Group>(scalars: &[&G::ScalarType], elems: &[&G]) -> Result<G> {
    pippenger_with_window(scalars, elems, optimal_window(scalars.len()))
}

/// Run the pippenger algorithm to compute multiscalar multiplication,
/// with bucket window `w`.
///
/// The result does not depend on `w`; it only trades bucket count against
/// the number of windows.
pub fn pippenger_with_window<G: Group>(
    scalars: &[&G::ScalarType],
    elems: &[&G],
    w: usize,
) -> Result<G> {
    if scalars.len() != elems.len() || w == 0 || w > MAX_WINDOW {
        return Err(AlgebraError::ParameterError);
    }
    if scalars.is_empty() {
        return Ok(G::get_identity());
    }

    #[cfg(feature = "parallel")]
    let digits_vec: Vec<Vec<i64>> = scalars
        .par_iter()
        .map(|s| scalar_to_radix_2_power_w::<G::ScalarType>(*s, w))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let digits_vec: Vec<Vec<i64>> = scalars
        .iter()
        .map(|s| scalar_to_radix_2_power_w::<G::ScalarType>(*s, w))
        .collect();

    let digits_count = digits_vec.iter().map(|d| d.len()).max().unwrap_or(0);
    let num_buckets = 1usize << (w - 1);

    let column = |index: usize| -> G {
        let mut buckets = vec![G::get_identity(); num_buckets];
        for (digits, elem) in digits_vec.iter().zip(elems) {
            match digits.get(index) {
                Some(&digit) if digit > 0 => buckets[(digit - 1) as usize].add_assign(*elem),
                Some(&digit) if digit < 0 => buckets[(-digit - 1) as usize].sub_assign(*elem),
                _ => {}
            }
        }
        // sum_i i * bucket_i, via running sums from the top bucket down
        let mut intermediate_sum = G::get_identity();
        let mut sum = G::get_identity();
        for bucket in buckets.iter().rev() {
            intermediate_sum.add_assign(bucket);
            sum.add_assign(&intermediate_sum);
        }
        sum
    };

    #[cfg(feature = "parallel")]
    let cols: Vec<G> = (0..digits_count).into_par_iter().map(column).collect();
    #[cfg(not(feature = "parallel"))]
    let cols: Vec<G> = (0..digits_count).map(column).collect();

    let mut res = G::get_identity();
    for col in cols.iter().rev() {
        for _ in 0..w {
            res = res.double();
        }
        res.add_assign(col);
    }
    Ok(res)
}
