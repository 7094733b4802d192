// Copyright 2026 the Kanvaso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations.

use arrayvec::ArrayVec;

/// Find real roots of a quadratic equation.
///
/// Returns values of x for which `c0 + c1 x + c2 x² = 0`, deduplicated and
/// in ascending order. Robust to the leading coefficient being zero or tiny,
/// in which case the equation is treated as linear.
pub fn solve_quadratic(c0: f64, c1: f64, c2: f64) -> ArrayVec<f64, 2> {
    let mut result = ArrayVec::new();
    let sc0 = c0 * c2.recip();
    let sc1 = c1 * c2.recip();
    if !sc0.is_finite() || !sc1.is_finite() {
        // c2 is zero or very small, treat as a linear equation
        let root = -c0 / c1;
        if root.is_finite() {
            result.push(root);
        } else if c0 == 0.0 && c1 == 0.0 {
            result.push(0.0);
        }
        return result;
    }
    let arg = sc1 * sc1 - 4. * sc0;
    let root1 = if !arg.is_finite() {
        // sc1 * sc1 overflowed; one root from sc1 x + x² = 0, the other
        // recovered as sc0 / root1 below.
        -sc1
    } else {
        if arg < 0.0 {
            return result;
        } else if arg == 0.0 {
            result.push(-0.5 * sc1);
            return result;
        }
        // See https://math.stackexchange.com/questions/866331
        -0.5 * (sc1 + arg.sqrt().copysign(sc1))
    };
    let root2 = sc0 / root1;
    if root2.is_finite() {
        // Sorted for determinism.
        if root2 > root1 {
            result.push(root1);
            result.push(root2);
        } else {
            result.push(root2);
            result.push(root1);
        }
    } else {
        result.push(root1);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify(mut roots: ArrayVec<f64, 2>, expected: &[f64]) {
        assert_eq!(expected.len(), roots.len());
        let epsilon = 1e-12;
        roots.sort_by(f64::total_cmp);
        for (root, &exp) in roots.iter().zip(expected) {
            assert!((root - exp).abs() < epsilon, "{root} != {exp}");
        }
    }

    #[test]
    fn quadratic() {
        verify(solve_quadratic(-5.0, 0.0, 5.0), &[-1.0, 1.0]);
        verify(solve_quadratic(5.0, 0.0, 5.0), &[]);
        verify(solve_quadratic(5.0, 1.0, 0.0), &[-5.0]);
        verify(solve_quadratic(1.0, 2.0, 1.0), &[-1.0]);
    }
}
