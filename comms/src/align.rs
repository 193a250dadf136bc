/// Primitive number types with at least 4-byte alignment.
///
/// Receive buffers are allocated over one of these so that tensor frames can
/// be reinterpreted as `f32` slices in place.
pub trait Align4: bytemuck::Pod {}

impl Align4 for u32 {}
impl Align4 for i32 {}
impl Align4 for u64 {}
impl Align4 for i64 {}
impl Align4 for u128 {}
impl Align4 for i128 {}
impl Align4 for f32 {}
impl Align4 for f64 {}
