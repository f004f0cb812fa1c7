//! Flat-slice math helpers. Row-major throughout; callers pass dimensions.

/// Dot product of two equal-length slices.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// L2 norm of a vector.
#[inline]
pub fn norm(a: &[f32]) -> f32 {
    dot(a, a).sqrt()
}

/// Dot product accumulated in f64, so squares of large f32 values cannot overflow.
#[inline]
pub fn dot_f64(a: &[f32], b: &[f32]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&x, &y)| x as f64 * y as f64).sum()
}

/// L2 norm accumulated in f64.
#[inline]
pub fn norm_f64(a: &[f32]) -> f64 {
    dot_f64(a, a).sqrt()
}

/// Numerically stable softmax in place (max-subtracted).
pub fn softmax_in_place(row: &mut [f32]) {
    let max_val = row.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum_exp = 0.0f32;
    for x in row.iter_mut() {
        *x = (*x - max_val).exp();
        sum_exp += *x;
    }
    if sum_exp > 0.0 {
        for x in row.iter_mut() {
            *x /= sum_exp;
        }
    }
}

/// Row vectors times matrix: out[R,N] = v[R,K] @ m[K,N].
pub fn vecmat(v: &[f32], m: &[f32], out: &mut [f32], rows: usize, k: usize, n: usize) {
    debug_assert_eq!(v.len(), rows * k);
    debug_assert_eq!(m.len(), k * n);
    debug_assert_eq!(out.len(), rows * n);

    for r in 0..rows {
        let out_row = &mut out[r * n..(r + 1) * n];
        out_row.fill(0.0);
        for p in 0..k {
            let coeff = v[r * k + p];
            if coeff == 0.0 {
                continue;
            }
            for (o, &x) in out_row.iter_mut().zip(&m[p * n..(p + 1) * n]) {
                *o += coeff * x;
            }
        }
    }
}

/// Row vectors times transposed square matrix: out[R,N] = v[R,N] @ m[N,N]ᵗ.
pub fn vecmat_transposed(v: &[f32], m: &[f32], out: &mut [f32], rows: usize, n: usize) {
    debug_assert_eq!(v.len(), rows * n);
    debug_assert_eq!(m.len(), n * n);
    debug_assert_eq!(out.len(), rows * n);

    for r in 0..rows {
        let v_row = &v[r * n..(r + 1) * n];
        for i in 0..n {
            out[r * n + i] = dot(v_row, &m[i * n..(i + 1) * n]);
        }
    }
}

/// Shannon entropy (nats) of a non-negative weighting. Zero entries contribute nothing.
pub fn entropy(weights: &[f32]) -> f32 {
    weights
        .iter()
        .filter(|&&w| w > 0.0)
        .map(|&w| -w * w.ln())
        .sum()
}
