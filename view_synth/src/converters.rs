//! Built-in converters.

use std::fmt::Display;

use crate::PropertyConverter;

/// Replaces `None` with the type's default value.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneAsDefault;

impl<T: Default> PropertyConverter<Option<T>> for NoneAsDefault {
    type Output = T;

    fn convert(value: Option<T>) -> T {
        value.unwrap_or_default()
    }
}

/// Replaces a missing number with zero.
///
/// Unlike [`NoneAsDefault`] it is implemented for the primitive numeric
/// types only, so applying it to anything else is a compile error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneAsZero;

macro_rules! none_as_zero {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl PropertyConverter<Option<$ty>> for NoneAsZero {
                type Output = $ty;

                fn convert(value: Option<$ty>) -> $ty {
                    value.unwrap_or($zero)
                }
            }
        )*
    };
}

none_as_zero! {
    i8 => 0, i16 => 0, i32 => 0, i64 => 0, i128 => 0, isize => 0,
    u8 => 0, u16 => 0, u32 => 0, u64 => 0, u128 => 0, usize => 0,
    f32 => 0.0, f64 => 0.0,
}

/// Formats the value with [`Display`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Stringify;

impl<T: Display> PropertyConverter<T> for Stringify {
    type Output = String;

    fn convert(value: T) -> String {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 0)]
    #[case(Some(7), 7)]
    fn none_as_zero_fills_missing_numbers(#[case] value: Option<u16>, #[case] expected: u16) {
        assert_eq!(NoneAsZero::convert(value), expected);
    }

    #[rstest]
    fn none_as_default_uses_the_default() {
        assert_eq!(<NoneAsDefault as PropertyConverter<Option<String>>>::convert(None), "");
        assert_eq!(NoneAsDefault::convert(Some(vec![1_u8])), [1]);
    }

    #[rstest]
    fn stringify_displays_the_value() {
        assert_eq!(Stringify::convert(42_u64), "42");
    }
}
