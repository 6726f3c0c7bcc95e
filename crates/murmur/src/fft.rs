//! Complex FFT over real input frames.
//!
//! Recursive radix-2 decimation in time with a direct-DFT fallback for odd
//! lengths. Output is interleaved `(re, im)` pairs, `2 * input.len()`
//! floats. Recursion depth is bounded by the frame size (~9 levels for the
//! 400-sample analysis frames).

use std::f64::consts::PI;

/// Forward transform of a real frame into interleaved complex output.
///
/// `output` must hold `2 * input.len()` floats.
pub fn fft(input: &[f32], output: &mut [f32]) {
    let n = input.len();
    debug_assert_eq!(output.len(), 2 * n);

    if n == 1 {
        output[0] = input[0];
        output[1] = 0.0;
        return;
    }
    if n % 2 == 1 {
        dft(input, output);
        return;
    }

    let mut even = Vec::with_capacity(n / 2);
    let mut odd = Vec::with_capacity(n / 2);
    for (i, &v) in input.iter().enumerate() {
        if i % 2 == 0 {
            even.push(v);
        } else {
            odd.push(v);
        }
    }

    let mut even_out = vec![0.0f32; n];
    let mut odd_out = vec![0.0f32; n];
    fft(&even, &mut even_out);
    fft(&odd, &mut odd_out);

    for k in 0..n / 2 {
        let theta = 2.0 * PI * (k as f64) / (n as f64);
        let re = theta.cos() as f32;
        let im = -theta.sin() as f32;
        let re_odd = odd_out[2 * k];
        let im_odd = odd_out[2 * k + 1];
        output[2 * k] = even_out[2 * k] + re * re_odd - im * im_odd;
        output[2 * k + 1] = even_out[2 * k + 1] + re * im_odd + im * re_odd;
        output[2 * (k + n / 2)] = even_out[2 * k] - re * re_odd + im * im_odd;
        output[2 * (k + n / 2) + 1] = even_out[2 * k + 1] - re * im_odd - im * re_odd;
    }
}

/// Direct O(N^2) transform; the fallback for odd frame lengths.
pub fn dft(input: &[f32], output: &mut [f32]) {
    let n = input.len();
    debug_assert_eq!(output.len(), 2 * n);

    for k in 0..n {
        let mut re = 0.0f32;
        let mut im = 0.0f32;
        for (j, &x) in input.iter().enumerate() {
            let angle = 2.0 * PI * (k as f64) * (j as f64) / (n as f64);
            re += x * angle.cos() as f32;
            im -= x * angle.sin() as f32;
        }
        output[2 * k] = re;
        output[2 * k + 1] = im;
    }
}
