use serde::{Deserialize, Serialize};
use std::fmt;

/// The medallion layer a pipeline step writes to. Used to tag build-manifest
/// rows and log lines so a run can be traced layer by layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Bronze,
    Silver,
    Gold,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Bronze => "bronze",
            PipelineStage::Silver => "silver",
            PipelineStage::Gold => "gold",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
