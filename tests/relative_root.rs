//! Runs against `--root .`, so it changes the working directory. It lives in
//! its own test binary and holds a single test.

use std::cell::RefCell;
use std::fs;
use std::path::Path;

use lbcicd::area::Area;
use lbcicd::changelog;
use lbcicd::config::CicdConfig;
use lbcicd::pipeline::Pipeline;
use lbcicd::sqlcl::{Invocation, SqlRunner, Transcript};
use lbcicd::Result;
use tempfile::TempDir;

const CONTROLLER: &str =
    "<databaseChangeLog>\n  <include file=\"tables/emp.xml\"/>\n</databaseChangeLog>\n";
const HAND_WRITTEN: &str =
    "<databaseChangeLog>\n  <changeSet id=\"seed\" author=\"jdoe\">\n  </changeSet>\n</databaseChangeLog>\n";

/// Records which controllers existed when SQLcl was asked to regenerate.
struct ControllerWatch {
    seen: RefCell<Vec<(Area, bool)>>,
}

impl SqlRunner for ControllerWatch {
    fn run(&self, invocation: &Invocation) -> Result<Transcript> {
        let present = invocation.area.controller(Path::new(".")).exists();
        self.seen.borrow_mut().push((invocation.area, present));
        Ok(Transcript::scan("Connected.\n", Some(0), &[]))
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[test]
fn current_dir_root_removes_schema_controller() {
    let temp = TempDir::new().unwrap();
    std::env::set_current_dir(temp.path()).unwrap();

    let schema = Path::new(".").join("schema");
    write(&schema.join("controller.xml"), CONTROLLER);
    write(&schema.join("custom/seed.xml"), HAND_WRITTEN);

    let removed = changelog::prepare(&schema, true).unwrap();
    assert_eq!(removed.len(), 1);
    assert!(removed[0].ends_with("schema/controller.xml"));
    assert!(!schema.join("controller.xml").exists());
    assert!(schema.join("custom/seed.xml").exists());

    write(&schema.join("controller.xml"), CONTROLLER);
    write(&Path::new(".").join("apex/controller.xml"), HAND_WRITTEN);

    let runner = ControllerWatch {
        seen: RefCell::new(Vec::new()),
    };
    let config = CicdConfig::default();
    let report = Pipeline::new(&runner, &config, Path::new("."), "APP")
        .generate()
        .unwrap();

    assert_eq!(
        runner.seen.into_inner(),
        vec![(Area::Schema, false), (Area::Apex, true)]
    );
    assert_eq!(report.steps[0].removed.len(), 1);
    assert!(report.steps[1].removed.is_empty());
}
