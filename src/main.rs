use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use tracing_subscriber::EnvFilter;

use tpology::config::{config_toml, default_config_path, save_config, TpologyConfig};
use tpology::errors::{Result, TpologyError};
use tpology::graph::{build_graph, Graph, Node};
use tpology::render;
use tpology::resource::Resource;
use tpology::tpology::Tpology;

/// Resource inventory and reference graph tool.
#[derive(Parser)]
#[command(name = "tpology", version, about = "Resource inventory and reference graph tool")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Path to the config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Path to the git cache directory
    #[arg(long, global = true)]
    git_cache_dir: Option<PathBuf>,
    /// Path to a local inventory directory
    #[arg(short = 'l', long, global = true)]
    inventory_local: Option<PathBuf>,
    /// URL of the inventory repository
    #[arg(short = 'i', long, global = true)]
    inventory: Option<String>,
    /// Git reference of the inventory repository
    #[arg(short = 'r', long, global = true)]
    inventory_ref: Option<String>,
    /// Fail on duplicate resources instead of keeping the last one
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Query inventory resources
    #[command(visible_alias = "res", alias = "resources")]
    Resource {
        #[command(subcommand)]
        command: ResourceCommand,
    },
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ResourceCommand {
    /// List resources
    List {
        /// Only list resources of this kind
        #[arg(short, long)]
        kind: Option<String>,
        /// List kinds instead of resources
        #[arg(long)]
        kinds: bool,
        /// Output format (table, csv, json, yaml)
        #[arg(short, long, default_value = "table")]
        format: String,
    },
    /// Show one resource with its references resolved
    Show {
        /// Resource as kind/name
        resource: String,
        /// Output format (yaml or json)
        #[arg(short, long, default_value = "yaml")]
        format: String,
    },
    /// Render the reference graph
    Graph {
        /// Output format (dot or json)
        #[arg(short, long, default_value = "dot")]
        format: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show what a resource references, or what references it
    Deps {
        /// Resource as kind/name
        resource: String,
        /// Show dependents instead of dependencies
        #[arg(long)]
        reverse: bool,
        /// Maximum number of hops
        #[arg(short, long, default_value = "16")]
        depth: usize,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.global.quiet, cli.global.verbose);
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(quiet: bool, verbose: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.global.config.clone().unwrap_or_else(default_config_path);
    let mut app = Tpology::open(&config_path)?;
    apply_overrides(app.config_mut(), &cli.global);

    match cli.command {
        Commands::Resource { command } => {
            let inventory = app.load_inventory()?;
            match command {
                ResourceCommand::List {
                    kind,
                    kinds,
                    format,
                } => {
                    if kinds {
                        let kinds: Vec<&str> = inventory.kinds().collect();
                        print!("{}", render::list_kinds(&kinds, &format)?);
                    } else {
                        let resources: Vec<&Resource> = match &kind {
                            Some(k) => inventory
                                .resources_of_kind(k)
                                .map(|m| m.values().collect())
                                .unwrap_or_default(),
                            None => inventory.iter().collect(),
                        };
                        print!("{}", render::list_resources(&resources, &format)?);
                    }
                }
                ResourceCommand::Show { resource, format } => {
                    let graph = build_graph(&inventory)?;
                    let node = find_node(&graph, &resource)?;
                    let value = render::node_json(&graph, node);
                    match format.as_str() {
                        "json" => println!("{}", serde_json::to_string_pretty(&value)?),
                        "yaml" => print!("{}", render::yaml_string(&value)?),
                        other => return Err(unknown_format(other)),
                    }
                }
                ResourceCommand::Graph { format, output } => {
                    let graph = build_graph(&inventory)?;
                    let mut out: Box<dyn Write> = match &output {
                        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
                        None => Box::new(io::stdout().lock()),
                    };
                    match format.as_str() {
                        "dot" => render::write_dot(&mut out, &graph)?,
                        "json" => {
                            serde_json::to_writer_pretty(&mut out, &render::graph_json(&graph))?;
                            writeln!(out)?;
                        }
                        other => return Err(unknown_format(other)),
                    }
                    out.flush()?;
                }
                ResourceCommand::Deps {
                    resource,
                    reverse,
                    depth,
                } => {
                    let graph = build_graph(&inventory)?;
                    let node = find_node(&graph, &resource)?;
                    let found = if reverse {
                        graph.dependents(node.id(), depth)
                    } else {
                        graph.dependencies(node.id(), depth)
                    };
                    if found.is_empty() {
                        println!("No {} for {}", if reverse { "dependents" } else { "dependencies" }, node);
                    }
                    for (id, edge) in &found {
                        if let (Some(n), Some(source)) = (graph.get(*id), graph.get(edge.source)) {
                            println!("{}  (via {}: {})", n, source, edge.path);
                        }
                    }
                }
            }
        }
        Commands::Config { command } => match command {
            ConfigCommand::Show => {
                print!("{}", config_toml(app.config())?);
            }
            ConfigCommand::Init { force } => {
                if config_path.exists() && !force {
                    return Err(TpologyError::Config {
                        message: format!(
                            "config file '{}' already exists; use --force to overwrite",
                            config_path.display()
                        ),
                    });
                }
                save_config(&config_path, &TpologyConfig::default())?;
                if !cli.global.quiet {
                    println!("Wrote {}", config_path.display());
                }
            }
        },
    }
    Ok(())
}

/// Command-line flags override the config file for this run.
fn apply_overrides(config: &mut TpologyConfig, global: &GlobalArgs) {
    if let Some(dir) = &global.git_cache_dir {
        config.git_cache_dir = dir.clone();
    }
    if let Some(local) = &global.inventory_local {
        config.inventory_local = Some(local.clone());
    }
    if let Some(url) = &global.inventory {
        config.inventory = url.clone();
    }
    if let Some(r) = &global.inventory_ref {
        config.inventory_ref = r.clone();
    }
    if global.strict {
        config.strict_duplicates = true;
    }
}

fn find_node<'g, 'a>(graph: &'g Graph<'a>, qualified: &str) -> Result<&'g Node<'a>> {
    graph.find(qualified).ok_or_else(|| TpologyError::UnknownResource {
        name: qualified.to_string(),
    })
}

fn unknown_format(format: &str) -> TpologyError {
    TpologyError::Render {
        message: format!("unknown format: {}", format),
    }
}
