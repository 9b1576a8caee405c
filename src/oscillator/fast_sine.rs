//! Fixed-point Taylor-series sine approximation.
//!
//! High-accuracy 11th order odd polynomial evaluated with rounding
//! multiply-accumulate steps. Input is a 32-bit phase covering one full
//! cycle, output is Q31 with the top 25 bits accurate.

// Based on MIT-licensed code (c) Paul Stoffregen, PJRC.COM, LLC.
// https://www.pjrc.com/high-precision-sine-wave-synthesis-using-taylor-series/

#[allow(unused_imports)]
use num_traits::float::Float;

#[inline(always)]
fn mul_rshift32_rounded(a: i32, b: i32) -> i32 {
    (((a as i64) * (b as i64) + 0x8000_0000) >> 32) as i32
}

#[inline(always)]
fn mul_acc_rshift32_rounded(sum: i32, a: i32, b: i32) -> i32 {
    sum.wrapping_add(mul_rshift32_rounded(a, b))
}

#[inline(always)]
fn mul_sub_rshift32_rounded(sum: i32, a: i32, b: i32) -> i32 {
    sum.wrapping_sub(mul_rshift32_rounded(a, b))
}

/// Sine of a 32-bit phase (one full cycle over the `u32` range), as Q31.
///
/// Total over all inputs, allocation-free, and branch-predictable: the only
/// branch is the quadrant fold.
#[inline]
pub fn sine_q31(phase: u32) -> i32 {
    // Fold into the [-90, 90] degree range using the top two phase bits.
    let angle = if phase >= 0xC000_0000 || phase < 0x4000_0000 {
        phase as i32 // angle: 0.32
    } else {
        0x8000_0000u32.wrapping_sub(phase) as i32 // angle: 2.30
    };

    let p1 = mul_rshift32_rounded(angle, 1686629713) << 2; //  p1:  2.30
    let p2 = mul_rshift32_rounded(p1, p1) << 1; //              p2:  3.29
    let p3 = mul_rshift32_rounded(p2, p1) << 2; //              p3:  3.29
    let mut sum = mul_sub_rshift32_rounded(p1, p3, 1431655765); // sum: 2.30
    let p5 = mul_rshift32_rounded(p3, p2); //                   p5:  6.26
    sum = mul_acc_rshift32_rounded(sum, p5, 572662306);
    let p7 = mul_rshift32_rounded(p5, p2); //                   p7:  9.23
    sum = mul_sub_rshift32_rounded(sum, p7, 109078534);
    let p9 = mul_rshift32_rounded(p7, p2); //                   p9: 12.20
    sum = mul_acc_rshift32_rounded(sum, p9, 12119837);
    let p11 = mul_rshift32_rounded(p9, p2); //                 p11: 15.17
    sum = mul_sub_rshift32_rounded(sum, p11, 881443);

    sum << 1 // 1.31
}

/// Sine of a 32-bit phase as a float in `[-1, 1]`.
#[inline]
pub fn sine_f32(phase: u32) -> f32 {
    sine_q31(phase) as f32 / 2147483648.0
}

/// Sine of an angle expressed in turns (1.0 = one full cycle).
///
/// Wraps into the fixed-point phase domain, so it shares the accuracy of
/// [`sine_q31`] for any finite argument.
#[inline]
pub fn sine_turns(turns: f32) -> f32 {
    let wrapped = turns - turns.floor();
    sine_f32((wrapped * 4294967296.0) as u32)
}

/// Cosine of an angle expressed in turns.
#[inline]
pub fn cosine_turns(turns: f32) -> f32 {
    sine_turns(turns + 0.25)
}
