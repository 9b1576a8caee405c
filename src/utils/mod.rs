//! Utility functions shared by the synthesis engines.

#[inline]
pub fn one_pole(out: &mut f32, in_: f32, coefficient: f32) {
    *out += coefficient * (in_ - *out);
}

#[inline]
pub fn clip_16(x: i32) -> i32 {
    x.clamp(-32768, 32767)
}
