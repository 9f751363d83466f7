/// Every simulation quantity is single precision.
pub type Scalar = f32;

const _: () = assert!(core::mem::size_of::<Scalar>() == 4);
