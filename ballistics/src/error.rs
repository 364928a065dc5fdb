use thiserror::Error;

use crate::hittable::HittableId;

#[derive(Debug, Error)]
pub enum BallisticsError {
    #[error("no hittable with id {0:?}")]
    UnknownHittable(HittableId),
    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),
}
