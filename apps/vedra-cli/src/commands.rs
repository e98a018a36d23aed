//! Command implementations
//!
//! Records live in JSON files. Every editing command loads the file into an
//! [`EditingSession`], applies its change and writes the result back.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use vedra_domain::{Creator, Record, Title, VisibilityLevel};
use vedra_editor::{
    format_file_size, CancelToken, CollectionPath, EditingSession, EditorConfig, FieldPath,
    FieldValue, FileCandidate, Identity, MisusePolicy, StaticIdentity, ValueKind,
};
use vedra_rdm_client::RdmClient;

use crate::cli::{AuthArgs, Cli, Command};
use crate::error::CliError;

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "VEDRA_TOKEN";

type Session = EditingSession<RdmClient, StaticIdentity>;

pub async fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::New { record, force } => new_record(&record, force, out),
        Command::Validate { record } => validate(&record, config, out),
        Command::Preview { record, json } => {
            let session = open_session(&record, config, StaticIdentity::anonymous())?;
            let summary = session.summary();
            if json {
                let text = serde_json::to_string_pretty(&summary)
                    .map_err(|e| CliError::Usage(format!("Cannot encode summary: {}", e)))?;
                writeln!(out, "{}", text)?;
            } else {
                writeln!(out, "{}", summary)?;
            }
            Ok(())
        }
        Command::Set {
            record,
            field,
            value,
        } => {
            let path = field.parse::<FieldPath>().map_err(|_| {
                CliError::Usage(format!("Unknown field {:?}. Known fields: {}", field, known_fields()))
            })?;
            let value = parse_value(path, &value)?;
            edit(&record, config, |s| Ok(s.set(path, value)?))?;
            writeln!(out, "Set {}", path)?;
            Ok(())
        }
        Command::AddTitle {
            record,
            title,
            title_type,
        } => {
            let mut entry = Title::new(title);
            if let Some(t) = title_type {
                entry = entry.with_type(t);
            }
            edit(&record, config, |s| {
                s.add_item(CollectionPath::Titles, entry)?;
                Ok(())
            })?;
            writeln!(out, "Added title")?;
            Ok(())
        }
        Command::AddCreator {
            record,
            name,
            orcid,
            affiliation,
        } => {
            let mut creator = Creator::new(name);
            creator.orcid = orcid;
            creator.affiliation = affiliation;
            edit(&record, config, |s| {
                s.add_item(CollectionPath::Creators, creator)?;
                Ok(())
            })?;
            writeln!(out, "Added creator")?;
            Ok(())
        }
        Command::AddKeyword { record, keywords } => {
            let mut added = 0;
            edit(&record, config, |s| {
                for keyword in &keywords {
                    if s.add_keyword(keyword)? {
                        added += 1;
                    }
                }
                Ok(())
            })?;
            writeln!(out, "Added {} keyword(s)", added)?;
            Ok(())
        }
        Command::AddFile { record, files } => add_files(&record, &files, config, out),
        Command::SaveDraft { record, auth } => save_draft(&record, auth, config, out).await,
        Command::Publish { record, auth } => publish(&record, auth, config, out).await,
        Command::Search { query, size, page } => {
            let client = RdmClient::new(&config.api)?;
            let results = client.search_records(&query, size, page).await?;
            writeln!(out, "{} record(s)", results.hits.total)?;
            for hit in &results.hits.hits {
                writeln!(out, "  {}  {}", hit.id, hit.title().unwrap_or("(untitled)"))?;
            }
            Ok(())
        }
        Command::Config { init } => show_config(cli.config.as_deref(), &config, init, out),
    }
}

/// Config from file or defaults; programmer-error panics are never wanted
/// when the input comes from a terminal
fn load_config(path: Option<&Path>) -> Result<EditorConfig, CliError> {
    let mut config = EditorConfig::load_or_default(path)?;
    config.misuse = MisusePolicy::Ignore;
    Ok(config)
}

fn read_record(path: &Path) -> Result<Record, CliError> {
    let json = std::fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    Ok(Record::from_json(&json)?)
}

fn write_record(path: &Path, record: &Record) -> Result<(), CliError> {
    let json = record.to_json_pretty()?;
    std::fs::write(path, json).map_err(|e| CliError::io(path, e))?;
    debug!(path = %path.display(), "wrote record");
    Ok(())
}

fn open_session(
    path: &Path,
    config: EditorConfig,
    identity: StaticIdentity,
) -> Result<Session, CliError> {
    let record = read_record(path)?;
    let client = RdmClient::new(&config.api)?;
    Ok(EditingSession::new(client, identity, config).with_record(record))
}

fn edit<F>(path: &Path, config: EditorConfig, change: F) -> Result<(), CliError>
where
    F: FnOnce(&mut Session) -> Result<(), CliError>,
{
    let mut session = open_session(path, config, StaticIdentity::anonymous())?;
    change(&mut session)?;
    write_record(path, session.record())
}

fn identity_from(auth: &AuthArgs) -> StaticIdentity {
    let token = auth
        .token
        .clone()
        .or_else(|| std::env::var(TOKEN_ENV).ok())
        .filter(|t| !t.trim().is_empty());
    match token {
        Some(token) => StaticIdentity::new(Identity::new("cli", "", "").with_token(token)),
        None => StaticIdentity::anonymous(),
    }
}

fn known_fields() -> String {
    FieldPath::all()
        .iter()
        .map(FieldPath::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Interpret a raw argument according to the kind of value `path` takes
fn parse_value(path: FieldPath, raw: &str) -> Result<FieldValue, CliError> {
    Ok(match path.kind() {
        ValueKind::Text => FieldValue::Text(raw.to_string()),
        ValueKind::Bool => FieldValue::Bool(raw.trim().parse().map_err(|_| {
            CliError::Usage(format!("{} takes true or false, got {:?}", path, raw))
        })?),
        ValueKind::List => FieldValue::List(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        ValueKind::Level => FieldValue::Level(raw.trim().parse::<VisibilityLevel>().map_err(|_| {
            CliError::Usage(format!(
                "{} takes one of: {}",
                path,
                VisibilityLevel::all()
                    .iter()
                    .map(VisibilityLevel::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?),
    })
}

fn new_record(path: &Path, force: bool, out: &mut impl Write) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    write_record(path, &Record::new())?;
    writeln!(out, "Created {}", path.display())?;
    Ok(())
}

fn validate(path: &Path, config: EditorConfig, out: &mut impl Write) -> Result<(), CliError> {
    let session = open_session(path, config, StaticIdentity::anonymous())?;
    let issues = session.validate();
    for issue in &issues {
        writeln!(out, "{}", issue)?;
    }
    for section in session.incomplete_sections() {
        writeln!(out, "Incomplete section: {}", section)?;
    }

    let errors = issues.iter().filter(|i| i.is_error()).count();
    if errors > 0 {
        return Err(CliError::Invalid(errors));
    }
    writeln!(out, "Ready to publish")?;
    Ok(())
}

fn add_files(
    path: &Path,
    files: &[std::path::PathBuf],
    config: EditorConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut batch = Vec::with_capacity(files.len());
    for file in files {
        let meta = std::fs::metadata(file).map_err(|e| CliError::io(file, e))?;
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        batch.push(FileCandidate::new(name, meta.len()));
    }

    let mut total = 0;
    edit(path, config, |s| {
        s.add_files(&batch)?;
        total = s.record().total_file_bytes();
        Ok(())
    })?;
    writeln!(
        out,
        "Attached {} file(s), {} in total",
        batch.len(),
        format_file_size(total)
    )?;
    Ok(())
}

fn cancel_on_ctrl_c() -> (CancelToken, tokio::task::JoinHandle<()>) {
    let cancel = CancelToken::new();
    let trigger = cancel.clone();
    let handle = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            trigger.cancel();
        }
    });
    (cancel, handle)
}

async fn save_draft(
    path: &Path,
    auth: AuthArgs,
    config: EditorConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut session = open_session(path, config, identity_from(&auth))?;
    if let Some(id) = auth.draft_id {
        session = session.with_draft_id(id);
    }

    let (cancel, ctrl_c) = cancel_on_ctrl_c();
    let outcome = session.save_draft(&cancel).await;
    ctrl_c.abort();

    let receipt = outcome?;
    writeln!(out, "Saved draft {}", receipt.draft_id)?;
    writeln!(out, "Pass --draft-id {} to update it", receipt.draft_id)?;
    Ok(())
}

async fn publish(
    path: &Path,
    auth: AuthArgs,
    config: EditorConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let mut session = open_session(path, config, identity_from(&auth))?;
    if let Some(id) = auth.draft_id {
        session = session.with_draft_id(id);
    }

    let (cancel, ctrl_c) = cancel_on_ctrl_c();
    let outcome = session.publish(&cancel).await;
    ctrl_c.abort();

    match outcome {
        Ok(receipt) => {
            info!(record_id = %receipt.record_id, "publish complete");
            writeln!(out, "Published record {}", receipt.record_id)?;
            if let Some(url) = receipt.doi_url() {
                writeln!(out, "DOI: {}", url)?;
            }
            if let Some(link) = session.share_link() {
                writeln!(out, "Share: {}", link)?;
            }
            Ok(())
        }
        Err(err) => {
            for message in session.last_errors() {
                writeln!(out, "  - {}", message)?;
            }
            Err(err.into())
        }
    }
}

fn show_config(
    path: Option<&Path>,
    config: &EditorConfig,
    init: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let text = config.to_toml()?;
    if !init {
        write!(out, "{}", text)?;
        return Ok(());
    }

    let target = path
        .map(Path::to_path_buf)
        .or_else(EditorConfig::default_path)
        .ok_or_else(|| CliError::Usage("No config directory on this platform".to_string()))?;
    if target.exists() {
        return Err(CliError::Usage(format!("{} already exists", target.display())));
    }
    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| CliError::io(dir, e))?;
    }
    std::fs::write(&target, EditorConfig::default().to_toml()?)
        .map_err(|e| CliError::io(&target, e))?;
    writeln!(out, "Wrote {}", target.display())?;
    Ok(())
}
