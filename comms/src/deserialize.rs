use std::io;

/// Deserialization from a received frame body.
///
/// The produced value may borrow from `buf`, which stays alive until the next
/// receive on the same channel.
pub trait Deserialize<'a>: Sized {
    fn deserialize(buf: &'a mut [u8]) -> io::Result<Self>;
}
