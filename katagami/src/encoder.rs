//! Encoding half of the conversion traits.
//!
//! The mirror image of [`crate::decoder`]: a value of type `T` implements
//! `Encoder<T, E>` for each output representation `E` that declares
//! `EncodableTo<T>`.
//!
//! ```
//! use katagami::encoder::{EncodableTo, Encoder};
//!
//! struct Flag(bool);
//!
//! impl EncodableTo<Flag> for Vec<u8> {}
//!
//! impl Encoder<Flag, Vec<u8>> for Flag {
//!     type Error = std::convert::Infallible;
//!
//!     fn encode(&self) -> Result<Vec<u8>, Self::Error> {
//!         Ok(vec![if self.0 { 0xff } else { 0x00 }])
//!     }
//! }
//!
//! assert_eq!(Flag(true).encode().unwrap(), vec![0xff]);
//! ```

/// Converts `self` (of type `T`) into the output representation `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    /// Error returned when `self` cannot be represented as `E`.
    type Error;

    /// Encodes `self` into `E`.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when `self` holds a value `E` cannot express.
    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker: `Self` may be produced from a `T` through [`Encoder`].
pub trait EncodableTo<T> {}
