//! Unit conversion utilities
//!
//! Job geometry arrives in pixels at a given resolution (dots per inch);
//! controllers expect millimeters. Also holds the axis-flip transform used
//! for beds whose origin sits on the opposite edge.

/// Millimeters per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Convert pixels at `dpi` to millimeters
pub fn px_to_mm(px: f64, dpi: f64) -> f64 {
    px * MM_PER_INCH / dpi
}

/// Convert millimeters to pixels at `dpi`
pub fn mm_to_px(mm: f64, dpi: f64) -> f64 {
    mm * dpi / MM_PER_INCH
}

/// Mirror a coordinate against a bed dimension
///
/// Applying it twice with the same dimension yields the input.
pub fn flip_axis(value: f64, dimension: f64) -> f64 {
    dimension - value
}

/// Convert a pixel coordinate to a physical one, mirrored when `flipped`
pub fn to_machine_axis(px: f64, dpi: f64, dimension: f64, flipped: bool) -> f64 {
    let mm = px_to_mm(px, dpi);
    if flipped {
        flip_axis(mm, dimension)
    } else {
        mm
    }
}

/// Format a coordinate the way the firmware parses it
///
/// Always six decimals with a `.` separator, whatever the host locale.
pub fn format_coordinate(value: f64) -> String {
    format!("{:.6}", value)
}
