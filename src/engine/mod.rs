pub mod charset;
pub mod progression;
pub mod timing;
