//! Subcommands and their execution.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{ArgGroup, Args, Subcommand};
use fleetdesk_storage::types::{EntityKind, FileHandle, StoragePath};
use fleetdesk_storage::{AttachmentStore, Attachments};

use crate::TRACING_TARGET_COMMAND;

/// Attachment storage operations.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Upload files under a common prefix and print their public URLs.
    Upload(UploadArgs),
    /// Upload one file to an exact storage path and print its public URL.
    Put {
        /// Local file to upload.
        file: PathBuf,
        /// Destination storage path.
        path: String,
    },
    /// Delete the object at a storage path.
    Delete {
        /// Storage path to delete.
        path: String,
    },
    /// Print the public URL of a storage path without uploading.
    Url {
        /// Storage path to resolve.
        path: String,
    },
    /// Check that the attachment bucket is reachable.
    Check,
}

/// Arguments of the `upload` command.
#[derive(Debug, Clone, Args)]
#[command(group(
    ArgGroup::new("destination")
        .required(true)
        .args(["prefix", "entity"])
))]
pub struct UploadArgs {
    /// Path prefix prepended verbatim to each file name, e.g. `incidents/7/`.
    #[arg(long, conflicts_with_all = ["entity", "id"])]
    pub prefix: Option<String>,

    /// Kind of record the files belong to (incident, vehicle, user).
    #[arg(long, requires = "id")]
    pub entity: Option<EntityKind>,

    /// Identifier of the owning record.
    #[arg(long, requires = "entity")]
    pub id: Option<String>,

    /// Local files to upload, in order.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

impl UploadArgs {
    /// Resolves the destination prefix.
    pub fn prefix(&self) -> anyhow::Result<String> {
        match (&self.prefix, self.entity, &self.id) {
            (Some(prefix), _, _) => Ok(prefix.clone()),
            (None, Some(kind), Some(id)) => Ok(StoragePath::entity_prefix(kind, id)),
            _ => Err(anyhow!("either --prefix or --entity with --id is required")),
        }
    }
}

/// Runs `command`, writing results to `out` one per line.
pub async fn execute<S, W>(
    attachments: &Attachments<S>,
    command: Command,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: AttachmentStore,
    W: Write,
{
    match command {
        Command::Upload(args) => {
            let prefix = args.prefix()?;
            let mut files = Vec::with_capacity(args.files.len());
            for path in &args.files {
                files.push(read_file(path).await?);
            }

            tracing::debug!(
                target: TRACING_TARGET_COMMAND,
                prefix = %prefix,
                count = files.len(),
                "Uploading batch"
            );

            let urls = attachments
                .upload_files(&files, &prefix)
                .await
                .context("batch upload failed")?;
            for url in urls {
                writeln!(out, "{url}")?;
            }
        }
        Command::Put { file, path } => {
            let file = read_file(&file).await?;
            let url = attachments
                .upload_file(&file, &StoragePath::new(path))
                .await
                .context("upload failed")?;
            writeln!(out, "{url}")?;
        }
        Command::Delete { path } => {
            let deleted = attachments
                .delete_file(&StoragePath::new(path))
                .await
                .context("delete failed")?;
            writeln!(out, "{deleted}")?;
        }
        Command::Url { path } => {
            let url = attachments.public_url(&StoragePath::new(path))?;
            writeln!(out, "{url}")?;
        }
        Command::Check => {
            attachments
                .check()
                .await
                .context("attachment bucket is not reachable")?;
            writeln!(out, "ok")?;
        }
    }

    Ok(())
}

/// Reads a local file into a [`FileHandle`], guessing its content type from
/// the extension.
pub async fn read_file(path: &Path) -> anyhow::Result<FileHandle> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("'{}' has no usable file name", path.display()))?;

    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;

    let file = FileHandle::new(name, data);
    Ok(match mime_guess::from_path(path).first_raw() {
        Some(content_type) => file.with_content_type(content_type),
        None => file,
    })
}
