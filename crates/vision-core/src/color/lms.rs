//! Dichromat simulation by LMS cone-space projection
//!
//! Follows Viénot, Brettel & Mollon (1999), "Digital video colourmaps for
//! checking the legibility of displays by dichromats": convert RGB to LMS
//! cone responses, replace the response of the missing cone with a linear
//! combination of the two remaining ones, and convert back. The resulting
//! `LMS->RGB * P * RGB->LMS` product is a single 3x3 matrix that can be
//! handed to a renderer as an ordinary color filter.
//!
//! The RGB->LMS matrix and projection coefficients are the set published
//! alongside the daltonization method of Fidaner, Lin & Ozguven (2005).

/// Row-major 3x3 matrix.
pub type Mat3 = [[f64; 3]; 3];

/// RGB to LMS cone response.
pub const RGB_TO_LMS: Mat3 = [
    [17.8824, 43.5161, 4.11935],
    [3.45565, 27.1554, 3.86714],
    [0.0299566, 0.184309, 1.46709],
];

/// LMS cone response to RGB (inverse of [`RGB_TO_LMS`]).
pub const LMS_TO_RGB: Mat3 = [
    [0.0809444479, -0.130504409, 0.116721066],
    [-0.0102485335, 0.0540193266, -0.113614708],
    [-0.000365296938, -0.00412161469, 0.693511405],
];

/// The cone class missing in a dichromat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cone {
    /// Long-wavelength (red) cones, protanopia
    Long,
    /// Medium-wavelength (green) cones, deuteranopia
    Medium,
    /// Short-wavelength (blue) cones, tritanopia
    Short,
}

impl Cone {
    /// Projection in LMS space that rebuilds the missing response.
    pub fn projection(self) -> Mat3 {
        match self {
            Cone::Long => [[0.0, 2.02344, -2.52581], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            Cone::Medium => [[1.0, 0.0, 0.0], [0.494207, 0.0, 1.24827], [0.0, 0.0, 1.0]],
            Cone::Short => [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-0.395913, 0.801109, 0.0]],
        }
    }
}

/// Multiply two 3x3 matrices.
pub fn mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// RGB mixing matrix simulating the absence of `cone`.
pub fn dichromat_matrix(cone: Cone) -> [[f32; 3]; 3] {
    let m = mul(&LMS_TO_RGB, &mul(&cone.projection(), &RGB_TO_LMS));
    m.map(|row| row.map(|v| v as f32))
}
