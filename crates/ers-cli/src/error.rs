//! CLI-level error type: wraps the layers beneath it plus argument-level
//! failures that only make sense once a scheme has been selected.

use ers_schemes::SchemeError;
use ers_types::ErsError;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("invalid domain: {0}")]
    Domain(#[from] ErsError),

    #[error(transparent)]
    Scheme(#[from] SchemeError),

    #[error("--downscale-bits is only meaningful for a Hilbert scheme")]
    DownscaleWithoutHilbert,
}
