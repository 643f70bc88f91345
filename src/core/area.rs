use std::path::{Path, PathBuf};

use serde::Serialize;

/// Changelog entry point expected in each area directory.
pub const CONTROLLER_FILE: &str = "controller.xml";

/// Logical deployment areas, in deploy order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Admin,
    Schema,
    Data,
    Apex,
}

impl Area {
    pub const ALL: [Area; 4] = [Area::Admin, Area::Schema, Area::Data, Area::Apex];

    pub fn dir_name(&self) -> &'static str {
        match self {
            Area::Admin => "admin",
            Area::Schema => "schema",
            Area::Data => "data",
            Area::Apex => "apex",
        }
    }

    pub fn dir(&self, root: &Path) -> PathBuf {
        root.join(self.dir_name())
    }

    pub fn controller(&self, root: &Path) -> PathBuf {
        self.dir(root).join(CONTROLLER_FILE)
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}
