/// Implements the standard arithmetic traits for thin newtype wrappers around an integer amount.
#[macro_export]
macro_rules! op {
    (binary $ty:ident, $trait:ident, $fn:ident) => {
        impl $trait for $ty {
            type Output = Self;

            fn $fn(self, rhs: Self) -> Self::Output {
                Self(self.0.$fn(rhs.0))
            }
        }
    };
    (inplace $ty:ident, $trait:ident, $fn:ident) => {
        impl $trait for $ty {
            fn $fn(&mut self, rhs: Self) {
                self.0.$fn(rhs.0)
            }
        }
    };
    (unary $ty:ident, $trait:ident, $fn:ident) => {
        impl $trait for $ty {
            type Output = Self;

            fn $fn(self) -> Self::Output {
                Self(self.0.$fn())
            }
        }
    };
}
