//! Chroma contribution tables
//!
//! Pre-computed fixed-point tables generated at compile time by build.rs.
//! Each table maps a raw chroma byte straight to its scaled contribution,
//! so the decoder inner loop is four loads, adds and a clamp per pixel.

include!(concat!(env!("OUT_DIR"), "/yuv_lut.rs"));

/// Combine a luma sample with pre-scaled chroma terms and clamp to a byte.
#[inline(always)]
pub fn channel(y: i32, chroma: i32) -> u32 {
    (((y << SHIFT) + chroma) >> SHIFT).clamp(0, 255) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral_chroma_is_zero() {
        assert_eq!(R_V[128], 0);
        assert_eq!(G_V[128], 0);
        assert_eq!(G_U[128], 0);
        assert_eq!(B_U[128], 0);
    }

    #[test]
    fn test_tables_match_coefficients() {
        let scale = (1 << SHIFT) as f64;
        for (i, &v) in R_V.iter().enumerate() {
            let expected = 1.370705 * (i as f64 - 128.0);
            assert!((v as f64 / scale - expected).abs() < 1e-4, "R_V[{i}]");
        }
        for (i, &v) in B_U.iter().enumerate() {
            let expected = 1.732446 * (i as f64 - 128.0);
            assert!((v as f64 / scale - expected).abs() < 1e-4, "B_U[{i}]");
        }
    }

    #[test]
    fn test_tables_are_monotonic() {
        for table in [&R_V, &G_V, &G_U, &B_U] {
            assert!(table.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_channel_clamps() {
        assert_eq!(channel(255, R_V[255]), 255);
        assert_eq!(channel(0, R_V[0]), 0);
        assert_eq!(channel(100, 0), 100);
    }
}
