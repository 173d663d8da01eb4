mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{MutationOutcome, ProjectListController};
use shared::{
    domain::ProjectId,
    protocol::{DraftField, IconUpload},
};

#[derive(Parser, Debug)]
#[command(name = "admin", about = "Manage portfolio projects on the remote backend")]
struct Cli {
    /// Backend base URL, overriding admin.toml and the environment.
    #[arg(long)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and print the project table.
    List,
    /// Create a project from the given fields.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        slug: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        tagline: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        description_secondary: String,
        #[arg(long, default_value = "")]
        app_store_url: String,
        /// Path to an icon image to attach.
        #[arg(long)]
        icon: Option<PathBuf>,
    },
    /// Delete a project by id.
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    let mut settings = config::load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }
    let controller = ProjectListController::new(settings.panel_config());

    match cli.command {
        Command::List => {
            controller.refresh().await?;
            print_projects(&controller).await;
        }
        Command::Add {
            name,
            slug,
            category,
            tagline,
            description,
            description_secondary,
            app_store_url,
            icon,
        } => {
            controller.update_draft(DraftField::Name, name).await;
            controller.update_draft(DraftField::Slug, slug).await;
            controller.update_draft(DraftField::Category, category).await;
            controller.update_draft(DraftField::Tagline, tagline).await;
            controller
                .update_draft(DraftField::Description, description)
                .await;
            controller
                .update_draft(DraftField::DescriptionSecondary, description_secondary)
                .await;
            controller
                .update_draft(DraftField::AppStoreUrl, app_store_url)
                .await;
            if let Some(path) = icon {
                controller
                    .set_icon_attachment(Some(read_icon(&path)?))
                    .await;
            }

            let outcome = controller.submit_draft().await;
            report_mutation("create", outcome, &controller).await;
        }
        Command::Delete { id } => {
            let outcome = controller.delete_record(ProjectId(id)).await;
            report_mutation("delete", outcome, &controller).await;
        }
    }

    Ok(())
}

fn read_icon(path: &Path) -> Result<IconUpload> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read icon '{}'", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "icon".to_string());
    let mime_type = guess_mime(&filename);
    Ok(IconUpload {
        filename,
        mime_type,
        bytes,
    })
}

fn guess_mime(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let mime = match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(mime.to_string())
}

async fn report_mutation(
    action: &str,
    outcome: MutationOutcome,
    controller: &ProjectListController,
) {
    match outcome.request {
        Ok(()) => println!("{action} accepted"),
        Err(err) if err.reached_backend() => println!("{action} rejected by backend: {err}"),
        Err(err) => println!("{action} request failed: {err}"),
    }
    match outcome.refresh {
        Ok(_) => print_projects(controller).await,
        Err(err) => println!("refresh failed, table left unchanged: {err}"),
    }
}

async fn print_projects(controller: &ProjectListController) {
    let visible = controller.visible_projects().await;
    if visible.is_empty() {
        println!("No projects found.");
        return;
    }
    for record in &visible {
        let icon = controller
            .display_icon_url(record)
            .unwrap_or_else(|| "No icon".to_string());
        println!(
            "{:>4}  {}  [{}]  {}  {}  {}",
            record.id.0,
            record.name.as_deref().unwrap_or_default(),
            record.category,
            record.tagline,
            record.app_store_url,
            icon
        );
    }
}
