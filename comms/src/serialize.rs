/// Serialization into a frame body.
///
/// Implementors append their encoded form to `buf`. Bulk numeric data may
/// instead be returned as a borrowed slice, which the sender writes after the
/// buffered part without copying it.
pub trait Serialize<'a> {
    fn serialize(&'a self, buf: &mut Vec<u8>) -> Option<&'a [u8]>;
}
