use anyhow::Result;
use clap::{Parser, Subcommand};

use revstamp::cli::{run_stamp_workflow, Operation, StampTarget, StampWorkflowArgs};
use revstamp::config::{self, Config};
use revstamp::gateway::FsGateway;
use revstamp::git::{Git2Repository, Repository};
use revstamp::paths;
use revstamp::revision::parse_revision;
use revstamp::ui;
use revstamp::version_file::FileKind;

#[derive(Parser)]
#[command(
    name = "revstamp",
    version,
    about = "Stamp a build revision into version files and commit them"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, value_enum, help = "Kind of the files given with --files")]
    kind: Option<FileKind>,

    #[arg(
        short,
        long,
        help = "Files to stamp, ';' separated, globs allowed, '!' excludes"
    )]
    files: Option<String>,

    #[arg(long, help = "Commit the stamped files")]
    commit: bool,

    #[arg(long, help = "Push the commit to the configured remote")]
    push: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, help = "Skip confirmation prompts")]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a revision number into every version file
    Insert {
        #[arg(allow_hyphen_values = true)]
        revision: String,
    },
    /// Add one to the revision of every version file
    Increment,
    /// Print the version of every target
    Show,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let operation = match &args.command {
        Command::Insert { revision } => match parse_revision(revision) {
            Ok(revision) => Operation::Insert(revision),
            Err(e) => {
                ui::display_error(&e.to_string());
                std::process::exit(1);
            }
        },
        Command::Increment => Operation::Increment,
        Command::Show => Operation::Show,
    };

    let targets = match resolve_targets(&args, &config) {
        Ok(targets) if !targets.is_empty() => targets,
        Ok(_) => {
            ui::display_error(
                "No version files given, use --files or add [[targets]] to revstamp.toml",
            );
            std::process::exit(1);
        }
        Err(e) => {
            ui::display_error(&e.to_string());
            std::process::exit(1);
        }
    };

    let commit = (args.commit || config.commit.enabled) && operation != Operation::Show;
    let mut push = commit && (args.push || config.commit.push);

    if push && !args.yes && !args.dry_run && ui::is_interactive() {
        push = ui::confirm_action(&format!(
            "Push the version commit to '{}'?",
            config.commit.remote
        ))?;
    }

    let repo = if commit && !args.dry_run {
        match Git2Repository::open(".") {
            Ok(repo) => Some(repo.with_fallback_author(
                &config.commit.author_name,
                &config.commit.author_email,
            )),
            Err(e) => {
                ui::display_error(&format!("Git repository error: {}", e));
                std::process::exit(1);
            }
        }
    } else {
        None
    };

    let workflow_args = StampWorkflowArgs {
        targets,
        operation,
        commit,
        push,
        dry_run: args.dry_run,
    };

    let result = match run_stamp_workflow(
        &workflow_args,
        &config,
        FsGateway::new(),
        repo.as_ref().map(|r| r as &dyn Repository),
    ) {
        Ok(result) => result,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    if !result.succeeded {
        ui::display_error("Some version files could not be stamped");
        std::process::exit(1);
    }

    ui::display_success(match operation {
        Operation::Show => "Done",
        _ if args.dry_run => "Dry run finished",
        _ => "Version files stamped",
    });
    Ok(())
}

/// Targets from `--files` (with `--kind` or guessed from file names), or
/// from the `[[targets]]` of the configuration.
fn resolve_targets(args: &Args, config: &Config) -> Result<Vec<StampTarget>> {
    let mut targets = Vec::new();

    if let Some(files) = &args.files {
        let collection = paths::collect_files(files, true)?;
        if let Some(warning) = &collection.warning {
            ui::display_boundary_warning(warning);
        }

        match args.kind {
            Some(kind) => targets.push(StampTarget {
                kind,
                paths: collection.files,
            }),
            None => {
                let (grouped, unknown) = paths::group_by_kind(&collection.files);
                if !unknown.is_empty() {
                    anyhow::bail!(
                        "Cannot tell the kind of \"{}\", use --kind",
                        paths::join_paths(&unknown)
                    );
                }
                targets.extend(
                    grouped
                        .into_iter()
                        .map(|(kind, paths)| StampTarget { kind, paths }),
                );
            }
        }
        return Ok(targets);
    }

    for target in &config.targets {
        let collection = paths::collect_files(&target.files, true)?;
        if let Some(warning) = &collection.warning {
            ui::display_boundary_warning(warning);
        }
        targets.push(StampTarget {
            kind: target.kind,
            paths: collection.files,
        });
    }

    Ok(targets)
}
