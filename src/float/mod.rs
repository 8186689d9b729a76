//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use num_traits::{Float as NumFloat, FromPrimitive, ToPrimitive};
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Signals are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
pub trait Float:
    Display + Debug + NumFloat + FromPrimitive + ToPrimitive + Sum + Send + Sync + 'static
{
}

impl Float for f64 {}
impl Float for f32 {}
