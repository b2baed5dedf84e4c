use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use bookmark_manager::{BookmarkManager, Node, Selection, ROOT_ID};

#[derive(Parser)]
#[command(name = "bookmark-manager")]
#[command(about = "In-memory bookmark tree manager with Netscape HTML import/export", long_about = None)]
#[command(version)]
struct Cli {
    /// Bookmark HTML file to operate on
    #[arg(short, long, global = true, default_value = "bookmarks.html")]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new bookmark file seeded with sample data
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List the links in a folder ("root" shows every link in the tree)
    Show {
        /// Folder name (defaults to the root view)
        #[arg(short = 'd', long)]
        folder: Option<String>,
    },

    /// Search links by title or URL substring (case-insensitive)
    Search {
        /// Search term
        term: String,

        /// Restrict the search to one folder
        #[arg(short = 'd', long)]
        folder: Option<String>,
    },

    /// Show folder and link totals
    Stats {
        /// Emit JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Create a folder
    NewFolder {
        /// Folder name
        name: String,

        /// Parent folder name (defaults to root)
        #[arg(short, long)]
        parent: Option<String>,

        /// Show what would change without writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Create a link
    NewLink {
        /// Link title
        title: String,

        /// Absolute URL
        url: String,

        /// Icon: a glyph token, an http image reference or a data: URI
        #[arg(short, long)]
        icon: Option<String>,

        /// Containing folder name (defaults to root)
        #[arg(short = 'd', long)]
        folder: Option<String>,

        /// Show what would change without writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete items by name; deleting a folder removes its whole subtree
    Delete {
        /// Folder names or link titles
        #[arg(required = true)]
        items: Vec<String>,

        /// Show what would change without writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Move items into another folder ("root" moves them to the top level)
    Move {
        /// Folder names or link titles
        #[arg(required = true)]
        items: Vec<String>,

        /// Target folder name
        #[arg(short, long)]
        to: String,

        /// Show what would change without writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Rename a folder or link
    Rename {
        /// Current folder name or link title
        item: String,

        /// New name
        #[arg(short, long)]
        to: String,

        /// Show what would change without writing the file
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse the file and report whether a re-export reproduces it
    Check,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let file = cli.file;

    match cli.command {
        Commands::Init { force } => {
            if file.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", file.display());
            }
            let mgr = BookmarkManager::sample();
            save(&file, &mgr)?;
            let stats = mgr.stats();
            info!(
                "✅ Wrote {} with {} folders and {} links",
                file.display(),
                stats.folders,
                stats.links
            );
        }

        Commands::Show { folder } => {
            let mgr = load(&file)?;
            let scope = resolve_folder(&mgr, folder.as_deref())?;
            let links = mgr.links_in(&scope);
            print_links(&links);
            println!("{} item(s)", links.len());
        }

        Commands::Search { term, folder } => {
            let mgr = load(&file)?;
            let scope = resolve_folder(&mgr, folder.as_deref())?;
            let links = mgr.search(&term, &scope);
            print_links(&links);
            println!("{} match(es) for \"{}\"", links.len(), term);
        }

        Commands::Stats { json } => {
            let mgr = load(&file)?;
            let stats = mgr.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Folders: {}", stats.folders);
                println!("Links:   {}", stats.links);
            }
        }

        Commands::NewFolder { name, parent, dry_run } => {
            let mut mgr = load(&file)?;
            let parent_id = resolve_folder(&mgr, parent.as_deref())?;
            let folder = mgr.create_folder(&name, &parent_id)?;
            if dry_run {
                info!("🏃 Dry run mode - no changes will be made");
            } else {
                save(&file, &mgr)?;
            }
            info!("✅ Created folder \"{}\"", folder.name);
        }

        Commands::NewLink { title, url, icon, folder, dry_run } => {
            let mut mgr = load(&file)?;
            let parent_id = resolve_folder(&mgr, folder.as_deref())?;
            let link = mgr.create_link(&title, &url, icon.as_deref(), &parent_id)?;
            if dry_run {
                info!("🏃 Dry run mode - no changes will be made");
            } else {
                save(&file, &mgr)?;
            }
            info!("✅ Created link \"{}\"", link.title);
        }

        Commands::Delete { items, dry_run } => {
            let mut mgr = load(&file)?;
            let mut selection = Selection::new();
            for id in resolve_items(&mgr, &items)? {
                selection.select(id);
            }
            selection.begin_delete();
            let removed = mgr.delete_items(selection.ids());
            selection.clear();
            if dry_run {
                info!("🏃 Dry run mode - no changes will be made");
            } else {
                save(&file, &mgr)?;
            }
            info!("✅ Deleted {} item(s)", removed);
        }

        Commands::Move { items, to, dry_run } => {
            let mut mgr = load(&file)?;
            let target = resolve_folder(&mgr, Some(&to))?;
            let mut selection = Selection::new();
            for id in resolve_items(&mgr, &items)? {
                selection.select(id);
            }
            selection.begin_move();
            let moved = mgr.move_items(selection.ids(), &target)?;
            selection.clear();
            if dry_run {
                info!("🏃 Dry run mode - no changes will be made");
            } else {
                save(&file, &mgr)?;
            }
            info!("✅ Moved {} item(s) to \"{}\"", moved, to);
        }

        Commands::Rename { item, to, dry_run } => {
            let mut mgr = load(&file)?;
            let ids = resolve_items(&mgr, std::slice::from_ref(&item))?;
            let id = ids.into_iter().next().context("nothing to rename")?;
            mgr.rename(&id, &to)?;
            if dry_run {
                info!("🏃 Dry run mode - no changes will be made");
            } else {
                save(&file, &mgr)?;
            }
            info!("✅ Renamed \"{}\" to \"{}\"", item, to);
        }

        Commands::Check => {
            let mgr = load(&file)?;
            let stats = mgr.stats();
            info!(
                "📖 Parsed {} folders and {} links from {}",
                stats.folders,
                stats.links,
                file.display()
            );
            let exported = mgr.export();
            let mut reimported = BookmarkManager::new();
            let restats = reimported.import(&exported)?;
            if restats == stats {
                info!("✅ Re-export is stable");
            } else {
                bail!(
                    "re-export drifted: {}/{} folders, {}/{} links",
                    stats.folders,
                    restats.folders,
                    stats.links,
                    restats.links
                );
            }
        }
    }

    Ok(())
}

fn load(file: &Path) -> Result<BookmarkManager> {
    let html = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let mut mgr = BookmarkManager::new();
    mgr.import(&html)
        .with_context(|| format!("failed to parse {}", file.display()))?;
    Ok(mgr)
}

fn save(file: &Path, mgr: &BookmarkManager) -> Result<()> {
    fs::write(file, mgr.export())
        .with_context(|| format!("failed to write {}", file.display()))
}

/// Map a folder name to its id; `None` or "root" means the root view.
fn resolve_folder(mgr: &BookmarkManager, name: Option<&str>) -> Result<String> {
    let Some(name) = name else {
        return Ok(ROOT_ID.to_string());
    };
    if name == ROOT_ID {
        return Ok(ROOT_ID.to_string());
    }
    let mut found = None;
    mgr.store().visit(&mut |node| {
        if found.is_none() {
            if let Some(folder) = node.as_folder() {
                if folder.name == name {
                    found = Some(folder.id.clone());
                }
            }
        }
    });
    found.with_context(|| format!("no folder named \"{name}\""))
}

/// Map folder names and link titles to node ids, first match wins.
fn resolve_items(mgr: &BookmarkManager, names: &[String]) -> Result<BTreeSet<String>> {
    let mut ids = BTreeSet::new();
    for name in names {
        let mut found = None;
        mgr.store().visit(&mut |node: &Node| {
            if found.is_none() && node.label() == name {
                found = Some(node.id().to_string());
            }
        });
        match found {
            Some(id) => {
                ids.insert(id);
            }
            None => bail!("no item named \"{name}\""),
        }
    }
    Ok(ids)
}

fn print_links(links: &[&bookmark_manager::Link]) {
    for link in links {
        match &link.icon {
            Some(icon) => println!("  {} -> {} [{}]", link.title, link.url, icon.as_str()),
            None => println!("  {} -> {}", link.title, link.url),
        }
    }
}
