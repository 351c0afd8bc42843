//! Normalization of raw ground-truth labels to positive/negative.

/// A ground-truth label that can be classified as positive or negative.
///
/// A label is positive when it is greater than zero (`true` for booleans)
/// and negative otherwise.
pub trait Label {
    /// Return whether the label is positive, or `None` if the label cannot
    /// be compared against zero (a NaN float).
    fn is_positive(&self) -> Option<bool>;
}

impl Label for bool {
    fn is_positive(&self) -> Option<bool> {
        Some(*self)
    }
}

macro_rules! impl_label_int {
    ($($t:ty),*) => {
        $(
            impl Label for $t {
                fn is_positive(&self) -> Option<bool> {
                    Some(*self > 0)
                }
            }
        )*
    };
}

macro_rules! impl_label_float {
    ($($t:ty),*) => {
        $(
            impl Label for $t {
                fn is_positive(&self) -> Option<bool> {
                    if self.is_nan() {
                        None
                    } else {
                        Some(*self > 0.0)
                    }
                }
            }
        )*
    };
}

impl_label_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_label_float!(f32, f64);

impl<L: Label + ?Sized> Label for &L {
    fn is_positive(&self) -> Option<bool> {
        (**self).is_positive()
    }
}
