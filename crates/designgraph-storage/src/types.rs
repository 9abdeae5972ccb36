//! Storage-layer listing types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use designgraph_core::{Design, DesignId};

/// Summary of a stored design (for listing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSummary {
    pub design_id: DesignId,
    pub name: String,
    pub component_count: usize,
    pub connection_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Design> for DesignSummary {
    fn from(design: &Design) -> Self {
        DesignSummary {
            design_id: design.design_id(),
            name: design.name().to_string(),
            component_count: design.components().len(),
            connection_count: design.connections().len(),
            created_at: design.created_at(),
            updated_at: design.updated_at(),
        }
    }
}
