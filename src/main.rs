use anyhow::Result;
use clap::{Parser, Subcommand};

use sitekeeper::cli::{
    handle_analyze_performance, handle_audit, handle_backup, handle_check_images,
    handle_check_links, handle_report, handle_restore, handle_sync, RemoteOverrides,
};
use sitekeeper::config::{SitePaths, SiteRegistry, Settings};
use sitekeeper::runlog::RunLog;
use sitekeeper::sync::SyncDirection;

#[derive(Parser)]
#[command(
    name = "sitekeeper",
    author = "Dimpho Olifant",
    version,
    about = "Website maintenance automation suite",
    long_about = "Sitekeeper scans static site trees for broken links and missing \
                  images, estimates page performance from file inventories, and \
                  manages timestamped zip backups with restore."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full audit (links, images, performance)
    Audit {
        /// Specific sites to audit (defaults to all registered sites)
        #[arg(long, num_args = 1..)]
        sites: Option<Vec<String>>,
    },

    /// Check for broken links
    CheckLinks {
        /// Specific sites to check
        #[arg(long, num_args = 1..)]
        sites: Option<Vec<String>>,
        /// Issue HEAD requests for external links
        #[arg(long)]
        include_external: bool,
    },

    /// Validate images (missing files, empty alt text)
    CheckImages {
        /// Specific sites to check
        #[arg(long, num_args = 1..)]
        sites: Option<Vec<String>>,
    },

    /// Analyze performance from file inventories
    AnalyzePerformance {
        /// Specific sites to analyze
        #[arg(long, num_args = 1..)]
        sites: Option<Vec<String>>,
    },

    /// Create a backup, or list existing backups
    Backup {
        /// List backups instead of creating one
        #[arg(long)]
        list: bool,
        /// Specific sites to back up (defaults to all registered sites)
        #[arg(long, num_args = 1..)]
        sites: Option<Vec<String>>,
    },

    /// Restore sites from a backup
    Restore {
        /// Backup timestamp (YYYY-MM-DD_HH-MM-SS)
        timestamp: String,
    },

    /// Record a sync to or from the remote server
    Sync {
        /// Sync direction
        #[arg(long, value_enum, default_value_t = SyncDirection::Push)]
        direction: SyncDirection,
        /// Remote server hostname
        #[arg(long)]
        remote_host: Option<String>,
        /// Remote server username
        #[arg(long)]
        remote_user: Option<String>,
        /// Remote server path
        #[arg(long)]
        remote_path: Option<String>,
        /// Persist the resolved remote settings
        #[arg(long)]
        save_config: bool,
    },

    /// Run the audit and render an HTML report
    Report {
        /// Specific sites to include
        #[arg(long, num_args = 1..)]
        sites: Option<Vec<String>>,
    },

    /// Show current configuration and paths
    Config,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let paths = SitePaths::new()?;
    paths.ensure_directories()?;
    let settings = Settings::load_or_create(&paths)?;
    let registry = SiteRegistry::from_settings(&paths, &settings);
    let log = RunLog::new(&paths);

    match cli.command {
        Some(Commands::Audit { sites }) => {
            handle_audit(&registry, &settings, &log, sites)?;
        }
        Some(Commands::CheckLinks {
            sites,
            include_external,
        }) => {
            handle_check_links(&registry, &settings, &log, sites, include_external)?;
        }
        Some(Commands::CheckImages { sites }) => {
            handle_check_images(&registry, &log, sites)?;
        }
        Some(Commands::AnalyzePerformance { sites }) => {
            handle_analyze_performance(&registry, &settings, &log, sites)?;
        }
        Some(Commands::Backup { list, sites }) => {
            handle_backup(&paths, &registry, &settings, &log, sites, list)?;
        }
        Some(Commands::Restore { timestamp }) => {
            handle_restore(&paths, &registry, &log, &timestamp)?;
        }
        Some(Commands::Sync {
            direction,
            remote_host,
            remote_user,
            remote_path,
            save_config,
        }) => {
            let overrides = RemoteOverrides {
                host: remote_host,
                user: remote_user,
                path: remote_path,
            };
            handle_sync(
                &paths, &registry, &settings, &log, direction, overrides, save_config,
            )?;
        }
        Some(Commands::Report { sites }) => {
            handle_report(&paths, &registry, &settings, &log, sites)?;
        }
        Some(Commands::Config) => {
            println!("Sitekeeper Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Log directory:    {}", paths.log_dir().display());
            println!("Report directory: {}", paths.report_dir().display());
            println!();
            println!("Settings:");
            println!("  Backup retention:    {}", settings.backup_retention);
            println!("  Link timeout:        {}s", settings.link_timeout_secs);
            println!("  External links:      {}", settings.include_external_links);
            println!();
            println!("Registered sites:");
            for (name, root) in registry.iter() {
                println!("  {} -> {}", name, root.display());
            }
        }
        None => {
            println!("Sitekeeper - Website maintenance automation");
            println!();
            println!("Run 'sitekeeper --help' for usage information.");
            println!("Run 'sitekeeper audit' to scan all registered sites.");
        }
    }

    Ok(())
}
