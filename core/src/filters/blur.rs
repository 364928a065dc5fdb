use rayon::prelude::*;

use crate::buffer::HeightfieldBuffer;

// Box widths whose successive application approximates a Gaussian of `sigma`
// (Kovesi, "Fast almost-Gaussian filtering"). Widths are always odd
pub fn boxes_for_gauss(sigma: f64, n: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let nf = n as f64;
    let ideal = (12.0 * sigma * sigma / nf + 1.0).sqrt();
    let mut wl = ideal.floor() as usize;
    if wl % 2 == 0 {
        wl = wl.saturating_sub(1);
    }
    let wl = wl.max(1);
    let wu = wl + 2;
    let wlf = wl as f64;
    let ideal_m = (12.0 * sigma * sigma - nf * wlf * wlf - 4.0 * nf * wlf - 3.0 * nf) / (-4.0 * wlf - 4.0);
    let m = ideal_m.round().max(0.0) as usize;
    (0..n).map(|i| if i < m { wl } else { wu }).collect()
}

// Approximate Gaussian blur from `passes` box blurs, each split into a
// horizontal and a vertical pass. Edges replicate the border value
pub fn gaussian_box_blur(g: &mut HeightfieldBuffer, sigma: f64, passes: usize) {
    if sigma <= 0.0 || passes == 0 {
        return;
    }
    let (w, h) = (g.xl(), g.yl());
    for width in boxes_for_gauss(sigma, passes) {
        let radius = (width - 1) / 2;
        if radius == 0 {
            continue;
        }
        // Rows
        box_blur_rows(g.as_mut_slice(), w, radius);
        // Columns, as rows of the transpose
        let mut transposed = transpose(g.as_slice(), w, h);
        box_blur_rows(&mut transposed, h, radius);
        let back = transpose(&transposed, h, w);
        g.as_mut_slice().copy_from_slice(&back);
    }
}

fn box_blur_rows(data: &mut [f64], width: usize, radius: usize) {
    data.par_chunks_mut(width).for_each(|row| box_blur_line(row, radius));
}

// Running-sum box blur of one line with clamped indices
fn box_blur_line(line: &mut [f64], radius: usize) {
    let n = line.len();
    if n < 2 {
        return;
    }
    let src = line.to_vec();
    let last = n as isize - 1;
    let at = |k: isize| src[k.clamp(0, last) as usize];
    let r = radius as isize;
    let scale = 1.0 / (2 * radius + 1) as f64;

    let mut sum: f64 = (-r..=r).map(at).sum();
    for (i, out) in line.iter_mut().enumerate() {
        *out = sum * scale;
        let i = i as isize;
        sum += at(i + r + 1) - at(i - r);
    }
}

fn transpose(data: &[f64], width: usize, height: usize) -> Vec<f64> {
    let mut out = vec![0.0; data.len()];
    for j in 0..height {
        for i in 0..width {
            out[i * height + j] = data[j * width + i];
        }
    }
    out
}
