use clap::{ArgGroup, Args, Parser, Subcommand};
use clap_complete::Shell;

use bookverse_core::VERSION;

/// BookVerse - a small library catalog and circulation tool
#[derive(Parser)]
#[command(name = "bookverse")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding books.txt, users.txt and borrow.txt
    #[arg(short, long, global = true, env = "BOOKVERSE_DATA_DIR")]
    pub data_dir: Option<String>,

    /// Config file override
    #[arg(long, global = true, env = "BOOKVERSE_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Who is running the command
#[derive(Args, Clone)]
pub struct LoginArgs {
    /// Account role (Admin or Student, any casing)
    #[arg(long, env = "BOOKVERSE_ROLE")]
    pub role: String,

    /// Account name
    #[arg(long, env = "BOOKVERSE_USER")]
    pub user: String,

    /// Disable interactive prompts (password must come from BOOKVERSE_PASSWORD)
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Data directory to create (defaults to the XDG data dir)
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Digest for new passwords: legacy or argon2
    #[arg(long, value_name = "SCHEME")]
    pub digest: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `register` command
#[derive(Args)]
pub struct RegisterArgs {
    #[command(flatten)]
    pub login: LoginArgs,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub login: LoginArgs,

    /// Catalog id
    #[arg(long)]
    pub id: i32,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub author: String,

    #[arg(long)]
    pub category: String,

    /// Total copies owned
    #[arg(long)]
    pub copies: u32,
}

/// Arguments for commands addressing one book
#[derive(Args)]
pub struct BookIdArgs {
    #[command(flatten)]
    pub login: LoginArgs,

    /// Catalog id
    #[arg(value_name = "ID")]
    pub id: i32,
}

/// Arguments for listing commands
#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub login: LoginArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `search` command
#[derive(Args)]
#[command(group(
    ArgGroup::new("criterion")
        .required(true)
        .args(["category", "topic", "keyword"])
))]
pub struct SearchArgs {
    #[command(flatten)]
    pub list: ListArgs,

    /// Exact category name
    #[arg(long)]
    pub category: Option<String>,

    /// Category by number, as listed by `bookverse categories`
    #[arg(long)]
    pub topic: Option<usize>,

    /// Substring of title, author or category (case-sensitive)
    #[arg(long)]
    pub keyword: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a config file and create the data directory
    Init(InitArgs),

    /// Register a new account
    Register(RegisterArgs),

    /// Verify credentials
    Login(LoginArgs),

    /// Add a book to the catalog (admin)
    Add(AddArgs),

    /// Delete every catalog row with an id (admin)
    Delete(BookIdArgs),

    /// List the whole catalog (admin)
    Books(ListArgs),

    /// Show the full borrow log (admin)
    Logs(ListArgs),

    /// Check the stores for duplicates and bad copy counts (admin)
    Check(ListArgs),

    /// Search the catalog
    Search(SearchArgs),

    /// List categories in catalog order
    Categories(ListArgs),

    /// Borrow a copy (student)
    Borrow(BookIdArgs),

    /// Return a copy (student)
    Return(BookIdArgs),

    /// Show your borrowing history (student)
    History(ListArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}
