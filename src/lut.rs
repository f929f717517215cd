//! Fixed-point trigonometry tables
//!
//! The bit-blit engine takes the rotation angle as a sine/cosine pair in
//! 16.16 fixed point. These tables hold `round(65536 * sin(deg))` and
//! `round(65536 * cos(deg))` for every integer degree and are the exact
//! values existing descriptor consumers expect.
//!
//! ## Example
//!
//! ```
//! use rga_blit::lut::{cos, sin, COS_TABLE, SIN_TABLE};
//!
//! assert_eq!(SIN_TABLE[90], 65536);
//! assert_eq!(COS_TABLE[180], -65536);
//! assert_eq!(sin(450), sin(90));
//! assert_eq!(cos(270), 0);
//! ```

/// Fixed-point one (1.0 in 16.16)
pub const FIXED_ONE: i32 = 1 << 16;

/// Number of entries in each table (one per integer degree)
pub const TABLE_SIZE: usize = 360;

/// Sine of each integer degree, scaled by 65536
#[rustfmt::skip]
pub const SIN_TABLE: [i32; TABLE_SIZE] = [
    0, 1144, 2287, 3430, 4572, 5712, 6850, 7987, 9121, 10252,
    11380, 12505, 13626, 14742, 15855, 16962, 18064, 19161, 20252, 21336,
    22415, 23486, 24550, 25607, 26656, 27697, 28729, 29753, 30767, 31772,
    32768, 33754, 34729, 35693, 36647, 37590, 38521, 39441, 40348, 41243,
    42126, 42995, 43852, 44695, 45525, 46341, 47143, 47930, 48703, 49461,
    50203, 50931, 51643, 52339, 53020, 53684, 54332, 54963, 55578, 56175,
    56756, 57319, 57865, 58393, 58903, 59396, 59870, 60326, 60764, 61183,
    61584, 61966, 62328, 62672, 62997, 63303, 63589, 63856, 64104, 64332,
    64540, 64729, 64898, 65048, 65177, 65287, 65376, 65446, 65496, 65526,
    65536, 65526, 65496, 65446, 65376, 65287, 65177, 65048, 64898, 64729,
    64540, 64332, 64104, 63856, 63589, 63303, 62997, 62672, 62328, 61966,
    61584, 61183, 60764, 60326, 59870, 59396, 58903, 58393, 57865, 57319,
    56756, 56175, 55578, 54963, 54332, 53684, 53020, 52339, 51643, 50931,
    50203, 49461, 48703, 47930, 47143, 46341, 45525, 44695, 43852, 42995,
    42126, 41243, 40348, 39441, 38521, 37590, 36647, 35693, 34729, 33754,
    32768, 31772, 30767, 29753, 28729, 27697, 26656, 25607, 24550, 23486,
    22415, 21336, 20252, 19161, 18064, 16962, 15855, 14742, 13626, 12505,
    11380, 10252, 9121, 7987, 6850, 5712, 4572, 3430, 2287, 1144,
    0, -1144, -2287, -3430, -4572, -5712, -6850, -7987, -9121, -10252,
    -11380, -12505, -13626, -14742, -15855, -16962, -18064, -19161, -20252, -21336,
    -22415, -23486, -24550, -25607, -26656, -27697, -28729, -29753, -30767, -31772,
    -32768, -33754, -34729, -35693, -36647, -37590, -38521, -39441, -40348, -41243,
    -42126, -42995, -43852, -44695, -45525, -46341, -47143, -47930, -48703, -49461,
    -50203, -50931, -51643, -52339, -53020, -53684, -54332, -54963, -55578, -56175,
    -56756, -57319, -57865, -58393, -58903, -59396, -59870, -60326, -60764, -61183,
    -61584, -61966, -62328, -62672, -62997, -63303, -63589, -63856, -64104, -64332,
    -64540, -64729, -64898, -65048, -65177, -65287, -65376, -65446, -65496, -65526,
    -65536, -65526, -65496, -65446, -65376, -65287, -65177, -65048, -64898, -64729,
    -64540, -64332, -64104, -63856, -63589, -63303, -62997, -62672, -62328, -61966,
    -61584, -61183, -60764, -60326, -59870, -59396, -58903, -58393, -57865, -57319,
    -56756, -56175, -55578, -54963, -54332, -53684, -53020, -52339, -51643, -50931,
    -50203, -49461, -48703, -47930, -47143, -46341, -45525, -44695, -43852, -42995,
    -42126, -41243, -40348, -39441, -38521, -37590, -36647, -35693, -34729, -33754,
    -32768, -31772, -30767, -29753, -28729, -27697, -26656, -25607, -24550, -23486,
    -22415, -21336, -20252, -19161, -18064, -16962, -15855, -14742, -13626, -12505,
    -11380, -10252, -9121, -7987, -6850, -5712, -4572, -3430, -2287, -1144,
];

/// Cosine of each integer degree, scaled by 65536
///
/// `cos(d) == sin(d + 90)`, so the table is the sine table shifted by a
/// quarter turn.
pub const COS_TABLE: [i32; TABLE_SIZE] = quarter_turn(&SIN_TABLE);

const fn quarter_turn(sin: &[i32; TABLE_SIZE]) -> [i32; TABLE_SIZE] {
    let mut out = [0; TABLE_SIZE];
    let mut deg = 0;
    while deg < TABLE_SIZE {
        out[deg] = sin[(deg + 90) % TABLE_SIZE];
        deg += 1;
    }
    out
}

/// Fixed-point sine of `degrees`, wrapped into 0..360
pub fn sin(degrees: u32) -> i32 {
    SIN_TABLE[degrees as usize % TABLE_SIZE]
}

/// Fixed-point cosine of `degrees`, wrapped into 0..360
pub fn cos(degrees: u32) -> i32 {
    COS_TABLE[degrees as usize % TABLE_SIZE]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal_angles() {
        assert_eq!((SIN_TABLE[0], COS_TABLE[0]), (0, FIXED_ONE));
        assert_eq!((SIN_TABLE[90], COS_TABLE[90]), (FIXED_ONE, 0));
        assert_eq!((SIN_TABLE[180], COS_TABLE[180]), (0, -FIXED_ONE));
        assert_eq!((SIN_TABLE[270], COS_TABLE[270]), (-FIXED_ONE, 0));
    }

    #[test]
    fn test_tabulated_values() {
        assert_eq!(SIN_TABLE[1], 1144);
        assert_eq!(SIN_TABLE[30], 32768);
        assert_eq!(SIN_TABLE[45], 46341);
        assert_eq!(SIN_TABLE[359], -1144);
        assert_eq!(COS_TABLE[1], 65526);
        assert_eq!(COS_TABLE[60], 32768);
        assert_eq!(COS_TABLE[359], 65526);
    }

    #[test]
    fn test_sine_is_odd() {
        for deg in 1..TABLE_SIZE {
            assert_eq!(SIN_TABLE[deg], -SIN_TABLE[TABLE_SIZE - deg], "deg {deg}");
        }
    }

    #[test]
    fn test_cosine_is_even() {
        for deg in 1..TABLE_SIZE {
            assert_eq!(COS_TABLE[deg], COS_TABLE[TABLE_SIZE - deg], "deg {deg}");
        }
    }

    #[test]
    fn test_lookup_wraps() {
        assert_eq!(sin(360), SIN_TABLE[0]);
        assert_eq!(cos(720 + 45), COS_TABLE[45]);
    }
}
