/// Linear interpolation between two f64 values
pub fn lerp_f64(start: f64, end: f64, alpha: f64) -> f64 {
    start + (end - start) * alpha
}

/// Maps any coordinate onto `[0, extent)`, so the grid behaves like a torus
pub fn wrap(coord: i32, extent: i32) -> i32 {
    coord.rem_euclid(extent)
}
