pub mod annotation;
pub mod queue;
pub mod response;
pub mod review;
pub mod score;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

// Integer check over JSON numbers: present, finite, no fractional part.
pub(crate) fn as_integer(value: Option<f64>) -> Option<i64> {
    let v = value?;
    if v.is_finite() && v.fract() == 0.0 {
        Some(v as i64)
    } else {
        None
    }
}
