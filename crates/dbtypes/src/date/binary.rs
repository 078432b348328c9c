//! Binary envelope for `Date`, shared with full instants.

use super::{Date, DateError};
use crate::convert::BinaryCodec;
use crate::instant::{decode_instant, encode_instant};

impl BinaryCodec for Date {
    type Error = DateError;

    fn encode_binary(&self) -> Result<Vec<u8>, Self::Error> {
        encode_instant(&self.0)
    }

    fn decode_binary(data: &[u8]) -> Result<Self, Self::Error> {
        decode_instant(data).map(Date)
    }
}
