//! The Baby Jubjub twisted Edwards curve, embedded in the BN254 scalar field.
//!
//! a*x^2 + y^2 = 1 + d*x^2*y^2 with a = 168700, d = 168696. Since a is a
//! square and d is not, the Edwards addition law is complete: the denominators
//! 1 +- d*x1*x2*y1*y2 are nonzero for every pair of curve points.

use halo2curves_axiom::bn256::Fr;
use halo2curves_axiom::ff::Field;
use num_bigint::BigUint;
use once_cell::sync::Lazy;

use crate::field::fr_from_biguint;

pub const EDWARDS_A: u64 = 168700;
pub const EDWARDS_D: u64 = 168696;

/// Order of the prime subgroup generated by [`base_point`].
pub static SUBGROUP_ORDER: Lazy<BigUint> = Lazy::new(|| {
    BigUint::parse_bytes(
        b"2736030358979909402780800718157159386076813972158567259200215660948447373041",
        10,
    )
    .expect("subgroup order constant parses")
});

static BASE_POINT: Lazy<Point> = Lazy::new(|| Point {
    x: fr_from_biguint(
        &BigUint::parse_bytes(
            b"5299619240641551281634865583518297030282874472190772894086521144482721001553",
            10,
        )
        .expect("base point x constant parses"),
    ),
    y: fr_from_biguint(
        &BigUint::parse_bytes(
            b"16950150798460657717958625567821834550301663161624707787222815936182638968203",
            10,
        )
        .expect("base point y constant parses"),
    ),
});

/// Generator of the prime-order subgroup (the cofactor-8 multiple of the
/// curve generator).
pub fn base_point() -> Point {
    *BASE_POINT
}

/// An affine point on Baby Jubjub.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: Fr,
    pub y: Fr,
}

impl Point {
    /// The additive identity (0, 1).
    pub fn identity() -> Self {
        Self {
            x: Fr::zero(),
            y: Fr::one(),
        }
    }

    /// Whether the coordinates satisfy the curve equation.
    pub fn is_on_curve(&self) -> bool {
        let x2 = self.x.square();
        let y2 = self.y.square();
        let a = Fr::from(EDWARDS_A);
        let d = Fr::from(EDWARDS_D);
        a * x2 + y2 == Fr::one() + d * x2 * y2
    }

    /// Complete twisted Edwards addition.
    pub fn add(&self, other: &Point) -> Point {
        let a = Fr::from(EDWARDS_A);
        let d = Fr::from(EDWARDS_D);
        let x1x2 = self.x * other.x;
        let y1y2 = self.y * other.y;
        let cross = d * x1x2 * y1y2;
        let x_num = self.x * other.y + self.y * other.x;
        let y_num = y1y2 - a * x1x2;
        let x_den = Option::<Fr>::from((Fr::one() + cross).invert())
            .expect("twisted Edwards addition is complete");
        let y_den = Option::<Fr>::from((Fr::one() - cross).invert())
            .expect("twisted Edwards addition is complete");
        Point {
            x: x_num * x_den,
            y: y_num * y_den,
        }
    }

    pub fn double(&self) -> Point {
        self.add(self)
    }

    /// Double-and-add scalar multiplication, most significant bit first.
    pub fn mul_scalar(&self, scalar: &BigUint) -> Point {
        let mut acc = Point::identity();
        for i in (0..scalar.bits()).rev() {
            acc = acc.double();
            if scalar.bit(i) {
                acc = acc.add(self);
            }
        }
        acc
    }
}
