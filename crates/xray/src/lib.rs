#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use xray_image as image;

#[doc(inline)]
pub use xray_imgproc as imgproc;

#[doc(inline)]
pub use xray_io as io;

#[doc(inline)]
pub use xray_enhance as enhance;

#[doc(inline)]
pub use xray_batch as batch;
