//! CLI argument parsing and command definitions.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "folio", author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "FOLIO_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Content and maintenance commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List entities of a kind as normalized views.
    List {
        /// Entity kind: services, additional-services, testimonials, posts, pages.
        kind: String,

        /// Fetch every page.
        #[arg(short, long)]
        all: bool,

        /// Items per request (1-100).
        #[arg(long)]
        per_page: Option<u32>,

        /// First page to request.
        #[arg(long)]
        page: Option<u32>,

        /// Print raw items instead of normalized views.
        #[arg(long)]
        raw: bool,
    },

    /// Show one entity by slug.
    Show {
        /// Entity kind.
        kind: String,

        /// Entity slug.
        slug: String,
    },

    /// Show an album of a service.
    Album {
        /// Service slug.
        service: String,

        /// Album path segment (derived slug or encoded name).
        segment: String,
    },

    /// Show home page content.
    Home,

    /// Show header and footer.
    Layout,

    /// Map a CMS URL to a site route.
    MapUrl {
        /// URL as authored in the CMS; omitted means absent.
        url: Option<String>,
    },

    /// Derive a slug from text.
    Slug {
        /// Text to slugify.
        text: String,
    },

    /// Generate the sitemap.
    Sitemap {
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Submit the contact form.
    Contact {
        /// Your name.
        #[arg(long)]
        name: String,

        /// Reply address.
        #[arg(long)]
        email: String,

        /// Phone number.
        #[arg(long)]
        phone: String,

        /// Subject line.
        #[arg(long)]
        subject: Option<String>,

        /// Message.
        #[arg(long)]
        message: String,
    },

    /// Configuration operations.
    Config(ConfigCommand),

    /// Print version information.
    Version,
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Print the effective configuration as TOML.
    Show,

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export configuration as environment variables.
    Export {
        /// Format as Docker --env flags.
        #[arg(long)]
        docker_env: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
