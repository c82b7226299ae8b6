//! The `define_id_types` macro.

/// Defines newtypes wrapping a small integer ID with a fixed number of
/// distinct values.
///
/// Each entry names the type, the int type it wraps, and its value count.
/// The generated types order and hash by ID, and serialize as their ID.
#[macro_export]
macro_rules! define_id_types {
  (
    $(
      $(#[$outer:meta])*
      $type_name:ident : $int_type:ty[$count:expr];
    )*
  ) => {
    $(
      #[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
      $(#[$outer])*
      pub struct $type_name($int_type);

      impl $type_name {
        /// How many distinct values this type takes on.
        pub const COUNT: usize = $count;

        /// Wraps an ID without checking it.
        ///
        /// # Safety
        ///
        /// Callers must ensure the ID is in `0..COUNT`.
        pub const unsafe fn new_unchecked(id: $int_type) -> Self {
          $type_name(id)
        }

        /// Wraps an ID, if it's in `0..COUNT`.
        pub const fn new(id: $int_type) -> Option<Self> {
          if id >= 0 && id < $count {
            Some($type_name(id))
          } else {
            None
          }
        }

        /// Wraps an array index without checking it.
        ///
        /// # Safety
        ///
        /// Callers must ensure the index is in `0..COUNT`.
        pub const unsafe fn from_index_unchecked(i: usize) -> Self {
          $type_name(i as $int_type)
        }

        /// Wraps an array index, if it's in `0..COUNT`.
        pub const fn from_index(i: usize) -> Option<Self> {
          if i < $count {
            Some($type_name(i as $int_type))
          } else {
            None
          }
        }

        /// The raw ID.
        pub const fn get(self) -> $int_type {
          self.0
        }

        /// The ID counting from 1.
        pub const fn ordinal(self) -> $int_type {
          self.0 + 1
        }

        /// The ID as an array index.
        pub const fn index(self) -> usize {
          self.0 as usize
        }

        /// Iterates every value in ID order.
        pub fn all() -> impl Iterator<Item = Self> + Clone {
          // Safe because the range is exactly the valid IDs.
          (0..$count).map(|i| unsafe { Self::new_unchecked(i) })
        }
      }

      impl TryFrom<usize> for $type_name {
        type Error = &'static str;
        fn try_from(value: usize) -> Result<Self, Self::Error> {
          $type_name::from_index(value).ok_or("Out of bounds")
        }
      }

      impl From<$type_name> for usize {
        fn from(id: $type_name) -> Self {
          id.index()
        }
      }
    )*
  };
}
