//! Bitmasks treated as sets of small integers.

use static_assertions::const_assert;
use std::{
  fmt::Debug,
  ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not},
};

/// A fixed-capacity collection of bits.
///
/// A `Bits` value is both a set of bits and a set of the integers
/// `0..CAPACITY` those bits stand for.
pub trait Bits
where
  Self: BitAnd<Output = Self>
    + BitAndAssign
    + BitOr<Output = Self>
    + BitOrAssign
    + BitXor<Output = Self>
    + BitXorAssign
    + Copy
    + Eq
    + Not<Output = Self>
    + Sized,
{
  /// How many bit positions there are.
  const CAPACITY: i32;

  /// The empty set.
  const ZERO: Self;

  /// The universal set: all CAPACITY bits set.
  const ONES: Self;

  /// The set holding just the bit for `value`.
  ///
  /// ## Panics
  ///
  /// Panics if `value` is outside `0..CAPACITY`.
  fn singleton(value: i32) -> Self;

  /// How many bits are set.
  fn len(self) -> i32;

  /// Whether no bits are set.
  fn is_empty(self) -> bool {
    self == Self::ZERO
  }

  /// Whether the bit for `value` is set.  Values out of range are never
  /// contained.
  fn contains(self, value: i32) -> bool {
    Self::is_valid_value(value) && !(self & Self::singleton(value)).is_empty()
  }

  /// The lowest set bit, alone.
  fn smallest_bit(self) -> Option<Self>;

  /// The `i`th lowest set bit, alone.  Linear in the capacity.
  fn bit_at(self, i: i32) -> Option<Self>;

  /// The value of the lowest set bit.
  fn smallest_value(self) -> Option<i32>;

  /// The value of the `i`th lowest set bit.
  fn value_at(self, i: i32) -> Option<i32> {
    let bit = self.bit_at(i)?;
    bit.smallest_value()
  }

  /// Whether `n` is in `0..CAPACITY`.
  fn is_valid_value(n: i32) -> bool {
    n >= 0 && n < Self::CAPACITY
  }

  /// Panics unless `n` is in `0..CAPACITY`.
  fn check(n: i32) {
    assert!(
      Self::is_valid_value(n),
      "{} is out of bounds, must be in 0..{}",
      n,
      Self::CAPACITY
    );
  }

  /// Sets the bit for `value`, returning true if it was clear.
  fn insert(&mut self, value: i32) -> bool;

  /// Clears the bit for `value`, returning true if it was set.
  fn remove(&mut self, value: i32) -> bool;
}

pub trait BitsIterable {
  /// The corresponding Bits type.
  type Item: Bits;

  /// Iterates the set bits one at a time.
  type BitIterator: Iterator<Item = Self::Item> + Clone + Copy + Debug + Eq + PartialEq;

  /// Iterates the values of the set bits.
  type ValueIterator: Iterator<Item = i32> + Clone + Copy + Debug + Eq + PartialEq;

  /// Iterates the set bits, lowest first, each as its own single-bit value.
  fn bit_iter(self) -> Self::BitIterator;

  /// Iterates the values of the set bits, lowest first.
  fn value_iter(self) -> Self::ValueIterator;
}

/// Yields each set bit of a `Bits` value as a single-bit value.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BitIter<T: Bits>(T);

impl<T: Bits> Iterator for BitIter<T> {
  type Item = T;
  fn next(&mut self) -> Option<T> {
    let bit = self.0.smallest_bit()?;
    self.0 &= !bit;
    Some(bit)
  }
}

/// Yields the values of the set bits of a `Bits` value.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ValueIter<T: Bits>(BitIter<T>);

impl<T: Bits> Iterator for ValueIter<T> {
  type Item = i32;
  fn next(&mut self) -> Option<i32> {
    self.0.next().and_then(Bits::smallest_value)
  }
}

/// Implements Bits for an unsigned integer type.
macro_rules! impl_int_bits {
  ($int:ty) => {
    const_assert!(<$int>::MIN == 0);
    impl Bits for $int {
      const CAPACITY: i32 = <$int>::BITS as i32;
      const ZERO: $int = 0;
      const ONES: $int = <$int>::MAX;
      fn singleton(value: i32) -> $int {
        Self::check(value);
        1 << value
      }
      fn len(self) -> i32 {
        self.count_ones() as i32
      }
      fn smallest_bit(self) -> Option<$int> {
        if self == 0 {
          None
        } else {
          Some(self & self.wrapping_neg())
        }
      }
      fn smallest_value(self) -> Option<i32> {
        self.smallest_bit().map(|bit| bit.trailing_zeros() as i32)
      }
      fn bit_at(self, mut i: i32) -> Option<Self> {
        if i < 0 || i >= self.len() {
          return None;
        }
        // Binary search on the population count of the lower half.
        let mut lo = 0;
        let mut hi = Self::CAPACITY;
        loop {
          let half_width = (hi - lo) / 2;
          let mask: $int = ((1 << half_width) - 1) << lo;
          let count = (self & mask).count_ones() as i32;
          if i >= count {
            i -= count;
            lo += half_width;
          } else {
            hi -= half_width;
          }
          if half_width == 1 {
            debug_assert_eq!(i, 0);
            return Some(1 << lo);
          }
        }
      }
      fn insert(&mut self, value: i32) -> bool {
        let bit = Self::singleton(value);
        let absent = (bit & *self) == 0;
        *self |= bit;
        absent
      }
      fn remove(&mut self, value: i32) -> bool {
        let bit = Self::singleton(value);
        let present = (bit & *self) != 0;
        *self &= !bit;
        present
      }
    }

    impl BitsIterable for $int {
      type Item = $int;
      type BitIterator = BitIter<$int>;
      type ValueIterator = ValueIter<$int>;

      fn bit_iter(self) -> BitIter<$int> {
        BitIter(self)
      }
      fn value_iter(self) -> ValueIter<$int> {
        ValueIter(self.bit_iter())
      }
    }
  };
}

impl_int_bits!(u16);
impl_int_bits!(u128);

/// Defines newtypes over Bits-implementing ints that use only the low bits.
macro_rules! define_wrapped_bits_types {
  (
    $(
      $(#[$outer:meta])*
      $type_name:ident : $int:ty[$capacity:expr];
    )*
  ) => {
    $(
      #[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
      $(#[$outer])*
      pub struct $type_name($int);

      const_assert!(<$int>::CAPACITY > $capacity);

      impl $type_name {
        /// The wrapped bitmask.
        pub const fn backing_int(self) -> $int {
          self.0
        }

        /// Wraps a bitmask, dropping any bits beyond the capacity.
        pub const fn from_backing_int(int: $int) -> Self {
          Self(int & Self::ONES.0)
        }

        /// Const form of `&`.
        pub const fn const_bitand(self, rhs: Self) -> Self {
          Self(self.0 & rhs.0)
        }

        /// Const form of `|`.
        pub const fn const_bitor(self, rhs: Self) -> Self {
          Self(self.0 | rhs.0)
        }

        /// Const form of `^`.
        pub const fn const_bitxor(self, rhs: Self) -> Self {
          Self(self.0 ^ rhs.0)
        }

        /// Const form of `!`.
        pub const fn const_not(self) -> Self {
          self.const_bitxor(Self::ONES)
        }
      }

      impl Bits for $type_name {
        const CAPACITY: i32 = $capacity;
        const ZERO: Self = Self(0);
        const ONES: Self = Self((1 << $capacity) - 1);
        fn singleton(value: i32) -> Self {
          Self::check(value);
          Self(<$int>::singleton(value))
        }
        fn len(self) -> i32 {
          self.0.len()
        }
        fn smallest_bit(self) -> Option<Self> {
          self.0.smallest_bit().map(Self)
        }
        fn smallest_value(self) -> Option<i32> {
          self.0.smallest_value()
        }
        fn bit_at(self, i: i32) -> Option<Self> {
          self.0.bit_at(i).map(Self)
        }
        fn insert(&mut self, value: i32) -> bool {
          Self::check(value);
          self.0.insert(value)
        }
        fn remove(&mut self, value: i32) -> bool {
          Self::check(value);
          self.0.remove(value)
        }
      }

      impl BitsIterable for $type_name {
        type Item = $type_name;
        type BitIterator = BitIter<$type_name>;
        type ValueIterator = ValueIter<$type_name>;
        fn bit_iter(self) -> Self::BitIterator {
          BitIter(self)
        }
        fn value_iter(self) -> Self::ValueIterator {
          ValueIter(self.bit_iter())
        }
      }

      impl BitsIterable for &$type_name {
        type Item = $type_name;
        type BitIterator = BitIter<$type_name>;
        type ValueIterator = ValueIter<$type_name>;
        fn bit_iter(self) -> Self::BitIterator {
          BitIter(*self)
        }
        fn value_iter(self) -> Self::ValueIterator {
          ValueIter(self.bit_iter())
        }
      }

      impl BitAnd for $type_name {
        type Output = Self;
        fn bitand(self, rhs: Self) -> Self {
          self.const_bitand(rhs)
        }
      }
      impl BitAndAssign for $type_name {
        fn bitand_assign(&mut self, rhs: Self) {
          self.0 &= rhs.0
        }
      }
      impl BitOr for $type_name {
        type Output = Self;
        fn bitor(self, rhs: Self) -> Self {
          self.const_bitor(rhs)
        }
      }
      impl BitOrAssign for $type_name {
        fn bitor_assign(&mut self, rhs: Self) {
          self.0 |= rhs.0
        }
      }
      impl BitXor for $type_name {
        type Output = Self;
        fn bitxor(self, rhs: Self) -> Self {
          self.const_bitxor(rhs)
        }
      }
      impl BitXorAssign for $type_name {
        fn bitxor_assign(&mut self, rhs: Self) {
          self.0 ^= rhs.0
        }
      }
      impl Not for $type_name {
        type Output = Self;
        fn not(self) -> Self {
          self.const_not()
        }
      }
      impl Debug for $type_name {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
          write!(f, "{}({:#o})", stringify!($type_name), self.0)
        }
      }
    )*
  };
}

define_wrapped_bits_types! {
  /// A 9-bit set: numerals, or locations within a unit.
  Bits9: u16[9];

  /// An 81-bit set: locations on the board.
  Bits81: u128[81];
}
