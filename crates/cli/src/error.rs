//! What can stop a `bandplot` run, and the exit status each one maps to.
//!
//! - 2: bad arguments, reported by clap before `run` starts
//! - 10: the pipeline could not be set up (context, program or buffers)
//! - 11: the PNG snapshot could not be written
//! - 12: `-W`/`-H` describe a surface that cannot be allocated
//! - 13: `--json` output could not be encoded

use bandplot_core::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Pipeline(RenderError),

    #[error("could not write snapshot: {0}")]
    Snapshot(String),

    #[error("surface size rejected: {0}")]
    Surface(String),

    #[error("could not encode JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Pipeline(_) => 10,
            CliError::Snapshot(_) => 11,
            CliError::Surface(_) => 12,
            CliError::Json(_) => 13,
        }
    }
}

impl From<RenderError> for CliError {
    fn from(e: RenderError) -> Self {
        match e {
            RenderError::Io(msg) => CliError::Snapshot(msg),
            RenderError::InvalidDimensions => CliError::Surface(e.to_string()),
            other => CliError::Pipeline(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandplot_core::ShaderError;

    #[test]
    fn missing_context_exits_with_10() {
        let err = CliError::from(RenderError::UnsupportedSurface("no webgl2".into()));
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("no webgl2"));
    }

    #[test]
    fn buffer_exhaustion_exits_with_10() {
        let err = CliError::from(RenderError::Resource("out of memory".into()));
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn varying_mismatch_keeps_link_log() {
        let shader_err = ShaderError::LinkError("v_color not written".into());
        let err = CliError::from(RenderError::from(shader_err));
        assert_eq!(err.exit_code(), 10);
        assert!(err.to_string().contains("v_color not written"));
    }

    #[test]
    fn unwritable_snapshot_exits_with_11() {
        let err = CliError::from(RenderError::Io("/readonly/out.png: permission denied".into()));
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().starts_with("could not write snapshot"));
    }

    #[test]
    fn rejected_surface_exits_with_12() {
        let err = CliError::from(RenderError::InvalidDimensions);
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().contains("width and height"));
    }

    #[test]
    fn malformed_json_exits_with_13() {
        let json_err = serde_json::from_str::<serde_json::Value>("{\"drawn\":").unwrap_err();
        assert_eq!(CliError::from(json_err).exit_code(), 13);
    }
}
