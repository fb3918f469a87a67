use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "petal")]
#[command(about = "Order card field-mapping tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every field of a field set against one order and print the report
    Preview {
        /// Field-set YAML layers applied over the embedded defaults, in merge order
        #[arg(long = "fields", num_args = 1..)]
        fields: Vec<String>,

        /// Order snapshot JSON file
        #[arg(long)]
        order: String,

        /// Label tables JSON file (florists, difficulty, productTypes)
        #[arg(long)]
        labels: Option<String>,
    },

    /// Run the publish gate over a layered field set
    Validate {
        /// Field-set YAML layers applied over the embedded defaults, in merge order
        #[arg(long = "fields", num_args = 1.., required = true)]
        fields: Vec<String>,

        /// Exit non-zero when the set is not publishable
        #[arg(long, default_value_t = false)]
        strict: bool,
    },

    /// Compute layered field-set hash + print canonical JSON (matches the daemon's config_hash)
    ConfigHash {
        /// Layers over the embedded defaults, in merge order (shop -> experiment...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Plan the update a card control would submit for an order
    #[command(group(
        ArgGroup::new("action")
            .required(true)
            .args(["status", "assign", "unassign", "notes"]),
    ))]
    Transition {
        /// Order snapshot JSON file
        #[arg(long)]
        order: String,

        /// Target status (unassigned | assigned | completed)
        #[arg(long)]
        status: Option<String>,

        /// Acting user; any status other than unassigned claims the order for this user
        #[arg(long, requires = "status")]
        user: Option<String>,

        /// Assign to this user id (blank unassigns)
        #[arg(long)]
        assign: Option<String>,

        /// Clear the assignee
        #[arg(long, default_value_t = false)]
        unassign: bool,

        /// Replace the order notes
        #[arg(long)]
        notes: Option<String>,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Preview {
            fields,
            order,
            labels,
        } => commands::preview::run(&fields, &order, labels.as_deref())?,

        Commands::Validate { fields, strict } => commands::validate::run(&fields, strict)?,

        Commands::ConfigHash { paths } => {
            let loaded = commands::load_fields(&paths)?;
            println!("config_hash={}", loaded.config_hash);
            println!("{}", loaded.canonical_json);
        }

        Commands::Transition {
            order,
            status,
            user,
            assign,
            unassign,
            notes,
        } => {
            let action = commands::transition::action_from_flags(
                status.as_deref(),
                user,
                assign,
                unassign,
                notes,
            )?;
            commands::transition::run(&order, action)?;
        }
    }

    Ok(())
}

/// Logs go to stderr; stdout carries only command output.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
