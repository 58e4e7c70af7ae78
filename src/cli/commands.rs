use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "jt", about = concat!("jobtrack v", env!("CARGO_PKG_VERSION"), " - your job search as a pipeline board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new board in the current directory
    Init(InitArgs),
    /// List applications, grouped by stage
    List(ListArgs),
    /// Show application details
    Show(ShowArgs),
    /// Add an application to the bottom of its column
    Add(AddArgs),
    /// Move an application to a column position
    Mv(MvArgs),
    /// Change an application's stage (moves it to the end of that column)
    Status(StatusArgs),
    /// Show or set the column order
    Stages(StagesArgs),
    /// Print the virtual window computed for a column (diagnostic)
    Window(WindowArgs),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Board name (default: inferred from directory name)
    #[arg(long)]
    pub name: Option<String>,
    /// Column order, comma-separated (default: all stages)
    #[arg(long, value_delimiter = ',')]
    pub stages: Vec<String>,
    /// Reinitialize even if jobtrack/ already exists
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only this stage
    #[arg(long)]
    pub status: Option<String>,
    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Application ID to show
    pub id: String,
}

#[derive(Args)]
pub struct WindowArgs {
    /// Number of cards in the column
    #[arg(long)]
    pub count: usize,
    /// Visible height of the column
    #[arg(long)]
    pub viewport: f64,
    /// Scroll offset from the top
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub scroll: f64,
    /// Extra cards beyond each edge (default: board config)
    #[arg(long)]
    pub overscan: Option<usize>,
    /// Height of one card (default: board config)
    #[arg(long)]
    pub item_size: Option<f64>,
    /// Columns this small are not virtualized (default: board config)
    #[arg(long)]
    pub threshold: Option<usize>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Company name
    pub company: String,
    /// Role title
    pub role: String,
    /// Initial stage (default: applied)
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Link to the posting
    #[arg(long)]
    pub url: Option<String>,
    /// Tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Application ID
    pub id: String,
    /// Target stage (default: current stage)
    #[arg(long)]
    pub to: Option<String>,
    /// Position in the target column, 0-indexed, counted without the moved
    /// card (default: end of column)
    #[arg(long)]
    pub index: Option<usize>,
    /// Move to top of the column
    #[arg(long, conflicts_with = "index")]
    pub top: bool,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Application ID
    pub id: String,
    /// New stage
    pub status: String,
}

#[derive(Args)]
pub struct StagesArgs {
    /// New column order, comma-separated (omit to show the current one)
    #[arg(value_delimiter = ',')]
    pub stages: Vec<String>,
}
