//! Decoding half of the conversion traits.
//!
//! A source type `T` implements `Decoder<T, D>` for every destination `D`
//! that declares `DecodableFrom<T>`:
//!
//! ```
//! use katagami::decoder::{DecodableFrom, Decoder};
//!
//! struct Octets<'a>(&'a [u8]);
//! struct Length(usize);
//!
//! impl<'a> DecodableFrom<Octets<'a>> for Length {}
//!
//! impl<'a> Decoder<Octets<'a>, Length> for Octets<'a> {
//!     type Error = std::convert::Infallible;
//!
//!     fn decode(&self) -> Result<Length, Self::Error> {
//!         Ok(Length(self.0.len()))
//!     }
//! }
//!
//! let length: Length = Octets(&[1, 2, 3]).decode().unwrap();
//! assert_eq!(length.0, 3);
//! ```

/// Converts `self` (of type `T`) into `D`.
pub trait Decoder<T, D: DecodableFrom<T>> {
    /// Error returned when the source cannot be interpreted as `D`.
    type Error;

    /// Decodes `self` into `D`.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when the source is malformed for `D`.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker: `Self` may be produced from a `T` through [`Decoder`].
pub trait DecodableFrom<T> {}
