// src/main.rs
//! Command-line entry point. The only place errors become
//! process-visible output.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quill::api::{ApiClient, HttpTransport};
use quill::auth::SystemClock;
use quill::config::{self, Config};
use quill::error::{QuillError, Result};
use quill::images::{process_images, process_update_assets, ImagePolicy};
use quill::keys::{
    decode_secret_key, encode_public_key, encode_secret_key, generate_secret_key, KeySigner,
};
use quill::post::{assemble_create, assemble_update, parse_document, PostOverrides};
use quill::prompt::{PasswordPrompt, TtyPrompt};
use quill::vault;

#[derive(Parser)]
#[command(name = "quill", version, about = "Publish signed posts to a remote content service")]
struct Cli {
    /// Path to a config file (defaults to ./quill.toml)
    #[arg(long, global = true, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the signing key
    Key {
        #[command(subcommand)]
        command: KeyCommand,
    },
    /// Publish a new post from a markdown file
    Publish {
        /// Markdown file with optional front matter
        file: PathBuf,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Update an existing post
    Update {
        /// Slug of the post to update
        slug: String,
        /// Markdown file supplying new content and front matter
        #[arg(long)]
        file: Option<PathBuf>,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Delete a post
    Delete {
        /// Slug of the post to delete
        slug: String,
    },
}

#[derive(Subcommand)]
enum KeyCommand {
    /// Generate a fresh key and seal it into the keyfile
    Generate {
        /// Overwrite an existing keyfile
        #[arg(long)]
        force: bool,
    },
    /// Import an existing key (qsec or hex) into the keyfile
    Import {
        /// The secret key, bech32 (qsec…) or 64 hex characters
        key: String,
        /// Overwrite an existing keyfile
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Default)]
struct OverrideArgs {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    slug: Option<String>,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    excerpt: Option<String>,
    #[arg(long)]
    featured_image: Option<String>,
    /// Comma-separated tag list
    #[arg(long, value_delimiter = ',')]
    tags: Option<Vec<String>>,
}

impl From<OverrideArgs> for PostOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            title: args.title,
            slug: args.slug,
            author: args.author,
            excerpt: args.excerpt,
            featured_image: args.featured_image,
            tags: args.tags,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quill=info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => {}
        Err(QuillError::OperationAborted) => {
            // Cancellation is not an operational failure
            eprintln!("aborted.");
            std::process::exit(130);
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Key { command } => match command {
            KeyCommand::Generate { force } => cmd_key_generate(&config, force),
            KeyCommand::Import { key, force } => cmd_key_import(&config, &key, force),
        },
        Command::Publish { file, overrides } => {
            cmd_publish(&config, &file, overrides.into()).await
        }
        Command::Update {
            slug,
            file,
            overrides,
        } => cmd_update(&config, &slug, file.as_deref(), overrides.into()).await,
        Command::Delete { slug } => cmd_delete(&config, &slug).await,
    }
}

fn cmd_key_generate(config: &Config, force: bool) -> Result<()> {
    let keyfile = &config.identity.keyfile;
    if keyfile.exists() && !force {
        return Err(QuillError::KeyfileExists(keyfile.clone()));
    }
    let secret = generate_secret_key();
    let password = read_new_password(&TtyPrompt)?;
    vault::seal_to_file(keyfile, &secret, &password)?;

    let signer = KeySigner::new(&secret);
    println!("secret key: {}", encode_secret_key(&secret)?);
    println!("public key: {}", encode_public_key(&signer.verifying_key())?);
    println!("sealed keyfile written to {}", keyfile.display());
    Ok(())
}

fn cmd_key_import(config: &Config, key: &str, force: bool) -> Result<()> {
    let keyfile = &config.identity.keyfile;
    if keyfile.exists() && !force {
        return Err(QuillError::KeyfileExists(keyfile.clone()));
    }
    let secret = decode_secret_key(key)?;
    let password = read_new_password(&TtyPrompt)?;
    vault::seal_to_file(keyfile, &secret, &password)?;

    let signer = KeySigner::new(&secret);
    println!("public key: {}", encode_public_key(&signer.verifying_key())?);
    println!("sealed keyfile written to {}", keyfile.display());
    Ok(())
}

async fn cmd_publish(config: &Config, file: &Path, overrides: PostOverrides) -> Result<()> {
    let input = std::fs::read_to_string(file)?;
    let doc = parse_document(&input);
    let mut payload = assemble_create(&doc, &overrides)?;

    let secret = vault::open(&config.identity.keyfile, &TtyPrompt)?;
    let signer = KeySigner::new(&secret);
    let transport = HttpTransport::new()?;
    let clock = SystemClock;
    let client = ApiClient::new(&config.api.base_url, &transport, &signer, &clock);

    let base_path = file.parent().unwrap_or_else(|| Path::new("."));
    let policy = ImagePolicy::from_config(&config.images);
    let processed = process_images(
        &payload.content,
        payload.featured_image.as_deref(),
        base_path,
        &client,
        &policy,
    )
    .await?;
    payload.content = processed.content;
    if let Some(url) = processed.featured_image_url {
        payload.featured_image = Some(url);
    }

    let created = client.create_post(&payload).await?;
    println!("published {}", created.url.as_deref().unwrap_or(&created.slug));
    Ok(())
}

async fn cmd_update(
    config: &Config,
    slug: &str,
    file: Option<&Path>,
    overrides: PostOverrides,
) -> Result<()> {
    let doc = match file {
        Some(path) => Some(parse_document(&std::fs::read_to_string(path)?)),
        None => None,
    };
    let mut payload = assemble_update(doc.as_ref(), &overrides)?;

    let secret = vault::open(&config.identity.keyfile, &TtyPrompt)?;
    let signer = KeySigner::new(&secret);
    let transport = HttpTransport::new()?;
    let clock = SystemClock;
    let client = ApiClient::new(&config.api.base_url, &transport, &signer, &clock);

    let base_path = file.and_then(Path::parent).unwrap_or_else(|| Path::new("."));
    let policy = ImagePolicy::from_config(&config.images);
    process_update_assets(&mut payload, base_path, &client, &policy).await?;

    let updated = client.update_post(slug, &payload).await?;
    println!("updated {}", updated.url.as_deref().unwrap_or(&updated.slug));
    Ok(())
}

async fn cmd_delete(config: &Config, slug: &str) -> Result<()> {
    let secret = vault::open(&config.identity.keyfile, &TtyPrompt)?;
    let signer = KeySigner::new(&secret);
    let transport = HttpTransport::new()?;
    let clock = SystemClock;
    let client = ApiClient::new(&config.api.base_url, &transport, &signer, &clock);

    client.delete_post(slug).await?;
    println!("deleted {slug}");
    Ok(())
}

/// Ask for a new keyfile password, with confirmation
fn read_new_password(prompt: &dyn PasswordPrompt) -> Result<String> {
    let first = prompt
        .ask("New keyfile password: ")?
        .ok_or(QuillError::OperationAborted)?;
    let second = prompt
        .ask("Confirm password: ")?
        .ok_or(QuillError::OperationAborted)?;
    if first != second {
        return Err(QuillError::PasswordMismatch);
    }
    Ok(first)
}
