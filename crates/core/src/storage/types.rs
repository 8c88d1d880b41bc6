use serde::{Deserialize, Serialize};

use crate::portfolio::{Image, Project};

/// A project record together with its images, ordered by sort order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithImages {
    pub project: Project,
    pub images: Vec<Image>,
}
