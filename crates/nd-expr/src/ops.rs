//! Operator tags for element-wise expressions.
//!
//! Each tag is an uninhabited type that names one operator from
//! [`std::ops`]. Expression nodes are generic over the tag, so the operator
//! is resolved at compile time. Binary tags promote mixed operands with
//! [`Promote`] before applying the operator.
//!
//! Integer rows use the plain [`std::ops`] operators, so overflow follows the
//! build profile: it panics when debug assertions are on and wraps otherwise.
//! Integer division or remainder by zero always panics.

use crate::dtype::Promote;

/// A function that combines a `T` with a `U`.
pub trait BinaryOp<T, U> {
    type Output;

    fn call(t: T, u: U) -> Self::Output;
}

/// A function of one element.
pub trait UnaryOp<T> {
    type Output;

    fn call(t: T) -> Self::Output;
}

macro_rules! binary_ops {
    ($($tag:ident => $method:ident;)*) => {
        $(
            pub enum $tag {}

            impl<T, U> BinaryOp<T, U> for $tag
            where
                T: Promote<U>,
                T::Output: std::ops::$tag<Output = T::Output>,
            {
                type Output = T::Output;

                #[inline(always)]
                fn call(t: T, u: U) -> Self::Output {
                    let (t, u) = t.promote(u);
                    std::ops::$tag::$method(t, u)
                }
            }
        )*
    };
}

binary_ops! {
    Add => add;
    Sub => sub;
    Mul => mul;
    Div => div;
    Rem => rem;
}

pub enum Neg {}

impl<T: std::ops::Neg> UnaryOp<T> for Neg {
    type Output = T::Output;

    #[inline(always)]
    fn call(t: T) -> Self::Output {
        -t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_same_type() {
        assert_eq!(<Add as BinaryOp<i32, i32>>::call(2, 3), 5);
        assert_eq!(<Sub as BinaryOp<i64, i64>>::call(2, 3), -1);
        assert_eq!(<Rem as BinaryOp<i32, i32>>::call(7, 4), 3);
    }

    #[test]
    fn test_mixed_types_promote() {
        let r: i64 = <Mul as BinaryOp<i32, i64>>::call(3, 4);
        assert_eq!(r, 12);
        let r: f64 = <Div as BinaryOp<i32, f32>>::call(1, 4.0);
        assert_relative_eq!(r, 0.25);
    }

    #[test]
    fn test_half_precision() {
        let a = half::f16::from_f32(1.5);
        let b = half::f16::from_f32(2.0);
        let r: half::f16 = <Add as BinaryOp<_, _>>::call(a, b);
        assert_eq!(r.to_f32(), 3.5);
    }

    #[test]
    fn test_neg() {
        assert_eq!(<Neg as UnaryOp<i32>>::call(4), -4);
        assert_relative_eq!(<Neg as UnaryOp<f64>>::call(0.5), -0.5);
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "overflow"))]
    fn test_integer_overflow_follows_build_profile() {
        let r = <Add as BinaryOp<i32, i32>>::call(std::hint::black_box(i32::MAX), 1);
        assert_eq!(r, i32::MIN);
    }

    #[test]
    #[should_panic]
    fn test_integer_division_by_zero_panics() {
        <Div as BinaryOp<i64, i32>>::call(1, std::hint::black_box(0));
    }
}
