//
// Copyright 2024 Signal Messenger, LLC
// SPDX-License-Identifier: AGPL-3.0-only
//

//! Composable, infallible serialization into byte buffers.
//!
//! A packet is described as a tuple of its parts, e.g.
//! `([0x80], [payload_type], sequence, timestamp, ssrc)`, and written in one pass
//! into a buffer sized up front from `written_len`.

pub trait Writer {
    fn written_len(&self) -> usize;
    fn write(&self, out: &mut dyn Writable);

    fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.written_len());
        self.write(&mut out);
        out
    }
}

/// A sink that always accepts everything given to it.
pub trait Writable {
    fn write(&mut self, input: &[u8]);
}

impl Writable for Vec<u8> {
    fn write(&mut self, input: &[u8]) {
        self.extend_from_slice(input);
    }
}

// There is deliberately no impl for u8 so that [u8] and [u8; N] can be written
// as raw bytes.
impl Writer for [u8] {
    fn written_len(&self) -> usize {
        self.len()
    }
    fn write(&self, out: &mut dyn Writable) {
        out.write(self);
    }
}

impl<const N: usize> Writer for [u8; N] {
    fn written_len(&self) -> usize {
        N
    }
    fn write(&self, out: &mut dyn Writable) {
        out.write(self);
    }
}

macro_rules! impl_writer_for_be_int {
    ($($int:ty),+) => {$(
        impl Writer for $int {
            fn written_len(&self) -> usize {
                std::mem::size_of::<$int>()
            }
            fn write(&self, out: &mut dyn Writable) {
                out.write(&self.to_be_bytes());
            }
        }
    )+};
}

impl_writer_for_be_int!(u16, u32);

macro_rules! impl_writer_for_tuple {
    ($($part:ident . $index:tt),+) => {
        impl<$($part: Writer),+> Writer for ($($part,)+) {
            fn written_len(&self) -> usize {
                0 $(+ self.$index.written_len())+
            }
            fn write(&self, out: &mut dyn Writable) {
                $(self.$index.write(out);)+
            }
        }
    };
}

impl_writer_for_tuple!(A.0, B.1);
impl_writer_for_tuple!(A.0, B.1, C.2);
impl_writer_for_tuple!(A.0, B.1, C.2, D.3);
impl_writer_for_tuple!(A.0, B.1, C.2, D.3, E.4);

// Lets borrowed parts (such as a payload slice) sit inside tuples.
impl<T: Writer + ?Sized> Writer for &T {
    fn written_len(&self) -> usize {
        T::written_len(self)
    }
    fn write(&self, out: &mut dyn Writable) {
        T::write(self, out)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_big_endian_integers() {
        assert_eq!("0064", hex::encode(100u16.to_vec()));
        assert_eq!("ffff", hex::encode(u16::MAX.to_vec()));
        assert_eq!("000003c0", hex::encode(960u32.to_vec()));
        assert_eq!("deadbeef", hex::encode(0xDEADBEEFu32.to_vec()));
        assert_eq!(2, 1u16.written_len());
        assert_eq!(4, 1u32.written_len());
    }

    #[test]
    fn test_bytes() {
        let bytes = [1u8, 2, 255];
        assert_eq!("0102ff", hex::encode(bytes.to_vec()));
        assert_eq!("0102ff", hex::encode(Writer::to_vec(&bytes[..])));
        assert_eq!(3, bytes[..].written_len());
        assert_eq!(0, [0u8; 0].written_len());
    }

    #[test]
    fn test_rtp_shaped_tuple() {
        let header = ([0x80u8], [0x78u8], 1u16, 960u32, 0xDEADBEEFu32);
        assert_eq!(12, header.written_len());
        assert_eq!("80780001000003c0deadbeef", hex::encode(header.to_vec()));
    }

    #[test]
    fn test_nested_tuple_with_borrowed_payload() {
        let payload = vec![9u8, 8, 7];
        let packet = (([0x80u8], 65535u16), &payload[..]);
        assert_eq!(6, packet.written_len());
        assert_eq!("80ffff090807", hex::encode(packet.to_vec()));
    }
}
