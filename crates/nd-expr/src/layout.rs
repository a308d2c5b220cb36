use std::fmt;

/// How the elements of a container map onto linear memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Last axis is contiguous (C order).
    RowMajor,
    /// First axis is contiguous (Fortran order).
    ColumnMajor,
    /// Undetermined at compile time, e.g. an expression mixing layouts.
    Dynamic,
    /// Compatible with every layout. Reported by rank-0 entities, since a
    /// single element has no memory order.
    Any,
}

impl Layout {
    /// Layout used when storage is allocated for an expression whose own
    /// layout is not a physical one.
    pub const DEFAULT: Layout = Layout::RowMajor;

    /// Returns true if `self` and `other` describe the same memory order, or
    /// if either of them is `Any`.
    pub fn is_compatible(self, other: Layout) -> bool {
        self == other || self == Layout::Any || other == Layout::Any
    }

    /// The layout of an expression combining operands with layouts `self`
    /// and `other`.
    ///
    /// - equal layouts are kept
    /// - `Any` yields to the other side
    /// - anything else is `Dynamic`
    pub fn combine(self, other: Layout) -> Layout {
        match (self, other) {
            (a, b) if a == b => a,
            (Layout::Any, b) => b,
            (a, Layout::Any) => a,
            _ => Layout::Dynamic,
        }
    }

    /// Returns true for layouts that can describe real storage.
    pub fn is_physical(self) -> bool {
        matches!(self, Layout::RowMajor | Layout::ColumnMajor)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::RowMajor => write!(f, "row_major"),
            Layout::ColumnMajor => write!(f, "column_major"),
            Layout::Dynamic => write!(f, "dynamic"),
            Layout::Any => write!(f, "any"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Layout; 4] = [
        Layout::RowMajor,
        Layout::ColumnMajor,
        Layout::Dynamic,
        Layout::Any,
    ];

    #[test]
    fn test_any_is_wildcard() {
        for layout in ALL {
            assert!(Layout::Any.is_compatible(layout));
            assert!(layout.is_compatible(Layout::Any));
        }
    }

    #[test]
    fn test_concrete_compatibility() {
        assert!(Layout::RowMajor.is_compatible(Layout::RowMajor));
        assert!(!Layout::RowMajor.is_compatible(Layout::ColumnMajor));
        assert!(!Layout::ColumnMajor.is_compatible(Layout::Dynamic));
    }

    #[test]
    fn test_combine() {
        assert_eq!(Layout::RowMajor.combine(Layout::RowMajor), Layout::RowMajor);
        assert_eq!(Layout::Any.combine(Layout::ColumnMajor), Layout::ColumnMajor);
        assert_eq!(Layout::RowMajor.combine(Layout::Any), Layout::RowMajor);
        assert_eq!(Layout::Any.combine(Layout::Any), Layout::Any);
        assert_eq!(Layout::RowMajor.combine(Layout::ColumnMajor), Layout::Dynamic);
        assert_eq!(Layout::Dynamic.combine(Layout::RowMajor), Layout::Dynamic);
    }

    #[test]
    fn test_physical() {
        assert!(Layout::RowMajor.is_physical());
        assert!(Layout::ColumnMajor.is_physical());
        assert!(!Layout::Dynamic.is_physical());
        assert!(!Layout::Any.is_physical());
    }

    #[test]
    fn test_display() {
        assert_eq!(Layout::Any.to_string(), "any");
        assert_eq!(Layout::ColumnMajor.to_string(), "column_major");
    }
}
