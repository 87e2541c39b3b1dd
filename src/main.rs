//! ResoView - a local gallery for imported image folders
//!
//! Headless driver: restores the gallery, optionally logs in, imports the
//! given directories and prints a folder summary.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use resoview::media::format_bytes;
use resoview::{App, Config};

/// ResoView - browse imported image folders
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log in as this user before importing
    #[arg(short, long, requires = "password")]
    user: Option<String>,

    /// Password for --user
    #[arg(short, long)]
    password: Option<String>,

    /// Create the --user account before logging in
    #[arg(long, requires = "user")]
    register: bool,

    /// Only list folders matching this text
    #[arg(short, long, default_value = "")]
    search: String,

    /// Directories to import
    #[arg(value_name = "DIR")]
    directories: Vec<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("resoview=info".parse()?))
        .init();

    tracing::info!("Starting ResoView");

    let config = Config::load(args.config)?;
    let mut app = App::open(&config).context("Failed to open the gallery store")?;

    if let (Some(user), Some(password)) = (args.user.as_deref(), args.password.as_deref()) {
        if args.register {
            app.register(user, password)
                .with_context(|| format!("Could not register {}", user))?;
            println!("User {} created.", user);
        }
        app.login(user, password)
            .with_context(|| format!("Login failed for {}", user))?;
    }

    match app.current_session() {
        Some(session) => println!("Logged in as {}", session.username),
        None => println!("Not logged in"),
    }

    for dir in &args.directories {
        println!("Importing from {}...", dir.display());
        let result = app.import_directory(dir).await;
        println!(
            "Import complete! Added {} images, skipped {} files.",
            result.imported_count,
            result.skipped_count()
        );
        for skipped in &result.skipped {
            println!("  skipped {}: {}", skipped.relative_path, skipped.reason);
        }
    }

    let keys = app.list_folders(&args.search);
    if keys.is_empty() {
        println!("No folders imported yet. Import a directory to get started.");
    }
    for key in keys {
        if let Some(folder) = app.get_folder(key) {
            println!(
                "{}  ({} files, {})",
                folder.key,
                folder.files.len(),
                format_bytes(folder.total_bytes())
            );
            for file in &folder.files {
                let marker = if app.preview(file).is_some() { "" } else { " [no preview]" };
                println!("  {}  {}{}", file.name, format_bytes(file.size_bytes), marker);
            }
        }
    }

    Ok(())
}
