use thiserror::Error;

/// Faults the pipeline distinguishes when a run aborts.
/// Stage faults carry the stage name so the operator knows where
/// the run stopped; the output file is never written after one.
#[derive(Debug, Error)]
pub enum TypografError {
    #[error("failed to read input document: {0:#}")]
    Input(anyhow::Error),

    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },

    #[error("failed to write output document: {0:#}")]
    Persist(anyhow::Error),
}

impl TypografError {
    pub fn stage(stage: &str, err: impl std::fmt::Display) -> Self {
        Self::Stage {
            stage: stage.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_names_the_failing_stage() {
        let err = TypografError::stage("dates", "backtrack limit exceeded");
        assert_eq!(
            err.to_string(),
            "stage 'dates' failed: backtrack limit exceeded"
        );
    }
}
