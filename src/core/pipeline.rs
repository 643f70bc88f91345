//! The three fixed action pipelines: deploy, generate and destroy.
//!
//! Each action is a straight sequence of steps. The first failing SQLcl run
//! aborts the action; steps already applied are not rolled back.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::area::{Area, CONTROLLER_FILE};
use crate::changelog;
use crate::config::CicdConfig;
use crate::error::Result;
use crate::sqlcl::{Invocation, SqlRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Deploy,
    Generate,
    Destroy,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Deploy => "deploy",
            Action::Generate => "generate",
            Action::Destroy => "destroy",
        }
    }
}

/// What one SQLcl run did, including changelog housekeeping around it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub area: Area,
    pub role: String,
    pub command: String,
    pub transcript_lines: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub removed: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cleaned: Vec<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineReport {
    pub action: Action,
    pub steps: Vec<StepReport>,
    /// Areas a deploy passed over because they have no controller.xml.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<Area>,
}

impl PipelineReport {
    fn new(action: Action) -> Self {
        Self {
            action,
            steps: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

pub struct Pipeline<'a, R: SqlRunner> {
    runner: &'a R,
    config: &'a CicdConfig,
    root: PathBuf,
    db_user: String,
}

impl<'a, R: SqlRunner> Pipeline<'a, R> {
    pub fn new(runner: &'a R, config: &'a CicdConfig, root: &Path, db_user: &str) -> Self {
        Self {
            runner,
            config,
            root: root.to_path_buf(),
            db_user: db_user.to_string(),
        }
    }

    pub fn run(&self, action: Action) -> Result<PipelineReport> {
        info!("Running {} for {}", action.as_str(), self.db_user);
        match action {
            Action::Deploy => self.deploy(),
            Action::Generate => self.generate(),
            Action::Destroy => self.destroy(),
        }
    }

    fn admin_role(&self) -> String {
        self.config.admin_role.clone()
    }

    /// Proxy connection: authenticate as the admin role, act as the schema user.
    fn proxy_role(&self) -> String {
        format!("{}[{}]", self.config.admin_role, self.db_user)
    }

    fn role_for(&self, area: Area) -> String {
        match area {
            Area::Admin => self.admin_role(),
            _ => self.proxy_role(),
        }
    }

    fn invoke(&self, area: Area, role: String, command: String) -> Result<StepReport> {
        let invocation = Invocation {
            area,
            role,
            command,
        };
        let transcript = self.runner.run(&invocation)?;

        Ok(StepReport {
            area: invocation.area,
            role: invocation.role,
            command: invocation.command,
            transcript_lines: transcript.lines.len(),
            removed: Vec::new(),
            cleaned: Vec::new(),
        })
    }

    /// Apply each area's controller.xml, skipping areas without one.
    pub fn deploy(&self) -> Result<PipelineReport> {
        let mut report = PipelineReport::new(Action::Deploy);

        for area in Area::ALL {
            if !area.controller(&self.root).is_file() {
                debug!("No {}/{}, skipping", area, CONTROLLER_FILE);
                report.skipped.push(area);
                continue;
            }

            let role = self.role_for(area);
            info!("Running {}/{} as {}", area, CONTROLLER_FILE, role);
            report
                .steps
                .push(self.invoke(area, role, deploy_command())?);
        }

        Ok(report)
    }

    /// Regenerate schema and APEX changelogs from the live database.
    pub fn generate(&self) -> Result<PipelineReport> {
        let mut report = PipelineReport::new(Action::Generate);

        let schema_dir = Area::Schema.dir(&self.root);
        let removed = changelog::prepare(&schema_dir, true)?;
        info!("Starting schema export...");
        let mut step = self.invoke(
            Area::Schema,
            self.proxy_role(),
            schema_export_command(self.config),
        )?;
        step.removed = removed;
        step.cleaned = changelog::clean(&schema_dir)?;
        report.steps.push(step);

        let apex_dir = Area::Apex.dir(&self.root);
        let removed = changelog::prepare(&apex_dir, false)?;
        info!("Starting apex export...");
        let mut step = self.invoke(
            Area::Apex,
            self.proxy_role(),
            apex_export_command(self.config),
        )?;
        step.removed = removed;
        step.cleaned = changelog::clean(&apex_dir)?;
        report.steps.push(step);

        Ok(report)
    }

    /// Roll back everything the admin controller applied.
    pub fn destroy(&self) -> Result<PipelineReport> {
        let mut report = PipelineReport::new(Action::Destroy);
        info!("Rolling back {}/{}", Area::Admin, CONTROLLER_FILE);
        report.steps.push(self.invoke(
            Area::Admin,
            self.admin_role(),
            rollback_command(self.config),
        )?);
        Ok(report)
    }
}

pub fn deploy_command() -> String {
    format!("lb update -changelog-file {};", CONTROLLER_FILE)
}

pub fn schema_export_command(config: &CicdConfig) -> String {
    let mut command = String::from("lb generate-schema");
    for flag in &config.schema_export_flags {
        command.push(' ');
        command.push_str(flag);
    }
    command
}

pub fn apex_export_command(config: &CicdConfig) -> String {
    let mut command = format!(
        "lb generate-apex-object -applicationid {}",
        config.apex_application_id
    );
    for toggle in &config.apex_export_toggles {
        command.push_str(&format!(" -{} true", toggle));
    }
    command
}

/// "Rollback all" is a rollback by a count larger than any changelog.
pub fn rollback_command(config: &CicdConfig) -> String {
    format!(
        "lb rollback-count -changelog {} -count {};",
        CONTROLLER_FILE, config.rollback_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_commands_match_sqlcl_syntax() {
        let config = CicdConfig::default();
        assert_eq!(deploy_command(), "lb update -changelog-file controller.xml;");
        assert_eq!(
            schema_export_command(&config),
            "lb generate-schema -split -grants -runonchange -fail-on-error"
        );
        assert_eq!(
            apex_export_command(&config),
            "lb generate-apex-object -applicationid 103 -expaclassignments true -expirnotif true \
             -exporiginalids true -exppubreports true -expsavedreports true -exptranslations true \
             -skipexportdate true"
        );
        assert_eq!(
            rollback_command(&config),
            "lb rollback-count -changelog controller.xml -count 999;"
        );
    }

    #[test]
    fn apex_command_follows_config() {
        let config = CicdConfig {
            apex_application_id: 200,
            apex_export_toggles: vec!["skipexportdate".to_string()],
            ..CicdConfig::default()
        };
        assert_eq!(
            apex_export_command(&config),
            "lb generate-apex-object -applicationid 200 -skipexportdate true"
        );
    }

    #[test]
    fn action_names() {
        assert_eq!(Action::Deploy.as_str(), "deploy");
        assert_eq!(
            serde_json::to_value(Action::Generate).unwrap(),
            serde_json::json!("generate")
        );
    }
}
