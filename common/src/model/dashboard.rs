use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counts shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_templates: u64,
    /// Users per role, for every role present in the directory.
    pub users_by_role: BTreeMap<String, u64>,
    pub templates_by_status: TemplateStatusCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateStatusCounts {
    pub draft: u64,
    pub published: u64,
}
