use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{info, info_span, warn};

use bulk_cli::render::{
    folder_table, help_table, issue_table, missing_artifacts_table, notification_line,
    preview_lines, schema_table, task_table, validation_summary,
};
use bulk_client::{
    ClientError, ClientSettings, Notification, StudyApiClient, UploadFile, UploadOrchestrator,
    UploadRequest, inspect_archive, missing_artifacts,
};
use bulk_model::{FolderTrail, StudyConfig};
use bulk_schema::{ColumnSchema, help_panel, validate_csv_path, write_template};

use crate::cli::{
    FoldersArgs, PreviewArgs, StudyArgs, StudySource, TemplateArgs, UploadArgs, ValidateArgs,
};

/// Settings file plus command-line overrides.
pub fn load_settings(path: Option<&Path>, api_url: Option<&str>) -> Result<ClientSettings> {
    let settings = ClientSettings::load(path).context("load client settings")?;
    match api_url {
        Some(url) => settings
            .with_api_base_url(url)
            .validated()
            .context("invalid --api-url"),
        None => Ok(settings),
    }
}

fn load_study(source: &StudySource, settings: &ClientSettings) -> Result<StudyConfig> {
    if let Some(path) = &source.study_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read study file {}", path.display()))?;
        return StudyConfig::from_json(&text)
            .with_context(|| format!("parse study file {}", path.display()));
    }
    let study_id = source
        .study
        .as_deref()
        .ok_or_else(|| anyhow!("either --study-file or --study is required"))?;
    let client = StudyApiClient::new(settings).context("create study service client")?;
    client
        .fetch_study_config(study_id)
        .with_context(|| format!("fetch configuration for study {study_id}"))
}

pub fn run_schema(args: &StudyArgs, settings: &ClientSettings) -> Result<()> {
    let config = load_study(&args.source, settings)?;
    let schema = ColumnSchema::derive(&config);
    println!(
        "Study: {} ({} artifacts per task, {} criteria)",
        config.display_name(),
        config.artifact_count_per_task,
        config.criteria.len()
    );
    println!("{}", schema_table(&schema));
    for name in schema.duplicate_names() {
        eprintln!("warning: column {name} appears more than once; uploads will be refused");
    }
    Ok(())
}

pub fn run_preview(args: &PreviewArgs, settings: &ClientSettings) -> Result<()> {
    let config = load_study(&args.source, settings)?;
    let schema = ColumnSchema::derive(&config);
    for line in preview_lines(&schema, args.expanded) {
        println!("{line}");
    }
    Ok(())
}

pub fn run_criteria(args: &StudyArgs, settings: &ClientSettings) -> Result<()> {
    let config = load_study(&args.source, settings)?;
    let entries = help_panel(&config);
    if entries.is_empty() {
        println!("This study has no evaluation criteria.");
        return Ok(());
    }
    println!("{}", help_table(&entries));
    Ok(())
}

pub fn run_template(args: &TemplateArgs, settings: &ClientSettings) -> Result<()> {
    if args.rows == 0 {
        bail!("--rows must be at least 1");
    }
    let config = load_study(&args.source, settings)?;
    let schema = ColumnSchema::derive(&config);
    let file = File::create(&args.output)
        .with_context(|| format!("create {}", args.output.display()))?;
    write_template(&schema, args.rows, BufWriter::new(file))
        .with_context(|| format!("write {}", args.output.display()))?;
    info!(path = %args.output.display(), rows = args.rows, "wrote template");
    println!("Template written to {}", args.output.display());
    Ok(())
}

/// Returns true when the file (and archive, if given) can be uploaded.
pub fn run_validate(args: &ValidateArgs, settings: &ClientSettings) -> Result<bool> {
    let config = load_study(&args.source, settings)?;
    let importable = check_files(&config, &args.csv, args.archive.as_deref())?;
    if importable {
        println!("{} is ready to upload.", args.csv.display());
    }
    Ok(importable)
}

/// Returns true when the upload succeeded.
pub fn run_upload(args: &UploadArgs, settings: &ClientSettings) -> Result<bool> {
    let span = info_span!("upload", study_id = %args.study);
    let _guard = span.enter();

    let mut request = UploadRequest::new(args.study.clone());
    if let Some(path) = &args.archive {
        request = request.with_archive(UploadFile::from_path(path));
    }
    if let Some(path) = &args.csv {
        request = request.with_csv(UploadFile::from_path(path));
    }
    // Nothing touches the network until both files are selected.
    if let Some(role) = request.missing_file() {
        let error = ClientError::MissingFile(role);
        eprintln!("{}", notification_line(&Notification::from_error(&error)));
        return Ok(false);
    }

    let client = StudyApiClient::new(settings).context("create study service client")?;
    if !args.skip_validation
        && let Some(csv) = &args.csv
    {
        let config = client
            .fetch_study_config(&args.study)
            .with_context(|| format!("fetch configuration for study {}", args.study))?;
        if !check_files(&config, csv, args.archive.as_deref())? {
            eprintln!("Upload not sent. Fix the problems above or pass --skip-validation.");
            return Ok(false);
        }
    }

    let orchestrator = UploadOrchestrator::new(client, settings.redirect_delay());
    let outcome = match orchestrator.submit(&request) {
        Ok(outcome) => outcome,
        Err(error) => {
            eprintln!("{}", notification_line(&Notification::from_error(&error)));
            return Ok(false);
        }
    };
    println!("{}", notification_line(&outcome.notification));

    info!(
        return_to = %outcome.return_to,
        delay_ms = u64::try_from(outcome.redirect_after.as_millis()).unwrap_or(u64::MAX),
        "returning to task list"
    );
    std::thread::sleep(outcome.redirect_after);
    match orchestrator.transport().list_tasks(&args.study) {
        Ok(tasks) => println!("{}", task_table(&tasks)),
        Err(error) => warn!(%error, "could not load the task list"),
    }
    Ok(true)
}

pub fn run_folders(args: &FoldersArgs, settings: &ClientSettings) -> Result<()> {
    let client = StudyApiClient::new(settings).context("create study service client")?;
    let mut trail = FolderTrail::root();
    let mut entries = client
        .list_folder(&args.study, None)
        .context("list root folder")?;

    let names = args
        .path
        .as_deref()
        .unwrap_or_default()
        .split('/')
        .map(str::trim)
        .filter(|name| !name.is_empty());
    for name in names {
        let folder = entries
            .iter()
            .find(|entry| entry.is_folder && entry.name == name)
            .ok_or_else(|| anyhow!("no folder named '{name}' in {}", trail.path()))?;
        trail.enter(folder);
        entries = client
            .list_folder(&args.study, Some(folder.id.as_str()))
            .with_context(|| format!("list {}", trail.path()))?;
    }

    println!("{}", folder_table(&trail, &entries));
    Ok(())
}

/// Validates the CSV, cross-checks the archive, and prints what was found.
///
/// Returns true when nothing blocks the upload.
fn check_files(config: &StudyConfig, csv: &Path, archive: Option<&Path>) -> Result<bool> {
    let report = validate_csv_path(config, csv)
        .with_context(|| format!("validate {}", csv.display()))?;
    println!("{}", validation_summary(&report));
    if let Some(table) = issue_table(&report) {
        println!("{table}");
    }
    let mut importable = report.is_importable();

    if let Some(archive) = archive {
        let listing = inspect_archive(archive)
            .with_context(|| format!("read archive {}", archive.display()))?;
        let missing = missing_artifacts(&listing, &report);
        info!(
            archive_files = listing.len(),
            missing = missing.len(),
            "checked archive"
        );
        if !missing.is_empty() {
            println!("{}", missing_artifacts_table(&missing));
            importable = false;
        }
    }
    Ok(importable)
}

#[cfg(test)]
mod tests {
    use std::io::ErrorKind;
    use std::net::TcpListener;
    use std::path::PathBuf;

    use super::*;

    /// Settings pointing at a local listener that never answers.
    fn listening_settings() -> (TcpListener, ClientSettings) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let settings = ClientSettings {
            api_base_url: format!("http://{}", listener.local_addr().unwrap()),
            timeout_secs: 1,
            ..ClientSettings::default()
        };
        (listener, settings)
    }

    fn connections(listener: &TcpListener) -> usize {
        let mut count = 0;
        loop {
            match listener.accept() {
                Ok(_) => count += 1,
                Err(error) if error.kind() == ErrorKind::WouldBlock => return count,
                Err(error) => panic!("accept failed: {error}"),
            }
        }
    }

    #[test]
    fn upload_without_archive_sends_nothing() {
        let (listener, settings) = listening_settings();
        let args = UploadArgs {
            study: "42".to_string(),
            csv: Some(PathBuf::from("tasks.csv")),
            archive: None,
            skip_validation: false,
        };

        assert!(!run_upload(&args, &settings).unwrap());
        assert_eq!(connections(&listener), 0);
    }

    #[test]
    fn upload_without_csv_sends_nothing() {
        let (listener, settings) = listening_settings();
        let args = UploadArgs {
            study: "42".to_string(),
            csv: None,
            archive: Some(PathBuf::from("artifacts.zip")),
            skip_validation: true,
        };

        assert!(!run_upload(&args, &settings).unwrap());
        assert_eq!(connections(&listener), 0);
    }
}
