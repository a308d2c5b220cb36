use half::f16;
use std::fmt;

/// Element types that expressions can compute with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 16-bit floating point (IEEE 754 half-precision, via the `half` crate).
    F16,
    /// 32-bit floating point.
    F32,
    /// 64-bit floating point.
    F64,
}

impl DType {
    /// The type both operands are converted to before a binary operator is
    /// applied. Mirrors the [`Promote`] impls.
    ///
    /// - identical types are kept
    /// - two integers widen to the wider integer
    /// - two floats widen to the wider float
    /// - an integer mixed with any float goes to `F64`
    pub fn promote(self, other: DType) -> DType {
        use DType::*;
        match (self, other) {
            (a, b) if a == b => a,
            (I32, I64) | (I64, I32) => I64,
            (F16, F32) | (F32, F16) => F32,
            _ => F64,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DType::I32 => write!(f, "i32"),
            DType::I64 => write!(f, "i64"),
            DType::F16 => write!(f, "f16"),
            DType::F32 => write!(f, "f32"),
            DType::F64 => write!(f, "f64"),
        }
    }
}

/// A Rust type with a [`DType`] tag.
pub trait Element: Copy + PartialEq + fmt::Debug + 'static {
    const DTYPE: DType;
}

impl Element for i32 {
    const DTYPE: DType = DType::I32;
}

impl Element for i64 {
    const DTYPE: DType = DType::I64;
}

impl Element for f16 {
    const DTYPE: DType = DType::F16;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;
}

/// Converts both sides of a mixed-type binary operation to a common type.
pub trait Promote<Rhs> {
    type Output;

    fn promote(self, rhs: Rhs) -> (Self::Output, Self::Output);
}

/// Lossless-enough conversion into a promoted type.
trait Widen<To> {
    fn widen(self) -> To;
}

impl<T> Widen<T> for T {
    #[inline(always)]
    fn widen(self) -> T {
        self
    }
}

macro_rules! widen {
    ($($from:ty => $to:ty: |$v:ident| $conv:expr;)*) => {
        $(
            impl Widen<$to> for $from {
                #[inline(always)]
                fn widen(self) -> $to {
                    let $v = self;
                    $conv
                }
            }
        )*
    };
}

widen! {
    i32 => i64: |v| v as i64;
    i32 => f64: |v| v as f64;
    i64 => f64: |v| v as f64;
    f16 => f32: |v| f32::from(v);
    f16 => f64: |v| f64::from(v);
    f32 => f64: |v| v as f64;
}

macro_rules! promote {
    ($($lhs:ty, $rhs:ty => $out:ty;)*) => {
        $(
            impl Promote<$rhs> for $lhs {
                type Output = $out;

                #[inline(always)]
                fn promote(self, rhs: $rhs) -> ($out, $out) {
                    (Widen::<$out>::widen(self), Widen::<$out>::widen(rhs))
                }
            }
        )*
    };
}

promote! {
    i32, i32 => i32;
    i32, i64 => i64;
    i32, f16 => f64;
    i32, f32 => f64;
    i32, f64 => f64;

    i64, i32 => i64;
    i64, i64 => i64;
    i64, f16 => f64;
    i64, f32 => f64;
    i64, f64 => f64;

    f16, i32 => f64;
    f16, i64 => f64;
    f16, f16 => f16;
    f16, f32 => f32;
    f16, f64 => f64;

    f32, i32 => f64;
    f32, i64 => f64;
    f32, f16 => f32;
    f32, f32 => f32;
    f32, f64 => f64;

    f64, i32 => f64;
    f64, i64 => f64;
    f64, f16 => f64;
    f64, f32 => f64;
    f64, f64 => f64;
}
