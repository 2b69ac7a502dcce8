use indexmap::IndexMap;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub enum WipCategory {
    Backlog,
    Prioritized,
    Wip,
    Done,
    Cancelled,
}

impl WipCategory {
    pub fn parse(label: &str) -> crate::model::Result<Self> {
        match label {
            "Backlog" => Ok(Self::Backlog),
            "Prioritized" => Ok(Self::Prioritized),
            "WIP" => Ok(Self::Wip),
            "Done" => Ok(Self::Done),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(format!(
                "unknown WIP category `{other}` (expected Backlog, Prioritized, WIP, Done or Cancelled)"
            )
            .into()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::Prioritized => "Prioritized",
            Self::Wip => "WIP",
            Self::Done => "Done",
            Self::Cancelled => "Cancelled",
        }
    }
}

// Status -> category mapping. Statuses not present in the mapping are
// counted as work in progress, so every record ends up categorized.
#[derive(Debug, Clone)]
pub struct WipMapping {
    statuses: IndexMap<String, WipCategory>,
}

impl WipMapping {
    pub fn new(statuses: IndexMap<String, WipCategory>) -> Self {
        Self { statuses }
    }

    pub fn categorize(&self, status: &str) -> WipCategory {
        self.statuses
            .get(status)
            .copied()
            .unwrap_or(WipCategory::Wip)
    }
}

impl Default for WipMapping {
    fn default() -> Self {
        let mut statuses = IndexMap::new();
        statuses.insert("Done".to_string(), WipCategory::Done);
        statuses.insert("Cancelled".to_string(), WipCategory::Cancelled);
        statuses.insert("Backlog".to_string(), WipCategory::Backlog);
        statuses.insert("To Do".to_string(), WipCategory::Prioritized);
        Self { statuses }
    }
}
