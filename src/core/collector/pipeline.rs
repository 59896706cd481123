//! Aggregation pipeline parsing

use crate::utils::error::{ExporterError, PipelineError, Result};
use bson::{Bson, Document};

/// Parse a relaxed extended JSON array into pipeline stages
pub fn parse_pipeline(text: &str) -> Result<Vec<Document>> {
    parse_stages(text).map_err(ExporterError::PipelineParse)
}

fn parse_stages(text: &str) -> std::result::Result<Vec<Document>, PipelineError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let Bson::Array(stages) = Bson::try_from(value)? else {
        return Err(PipelineError::NotAnArray);
    };

    stages
        .into_iter()
        .enumerate()
        .map(|(index, stage)| match stage {
            Bson::Document(stage) => Ok(stage),
            _ => Err(PipelineError::StageNotADocument(index)),
        })
        .collect()
}
