use clap::{Parser, Subcommand};

use sendly::commands;

#[derive(Parser)]
#[command(name = "sendly", version, about = "Send SMS from your terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Log in via the browser, or directly with an API key
    Login {
        /// Skip the browser flow and authenticate with this API key
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Log out of Sendly
    Logout,
    /// Show the current authentication status
    Whoami,
    /// Interactive onboarding for new users
    Onboarding,
    /// Manage teams
    #[command(subcommand)]
    Teams(TeamsCommand),
    /// Manage API keys
    #[command(subcommand)]
    Keys(KeysCommand),
    /// Inspect campaigns
    #[command(subcommand)]
    Campaigns(CampaignsCommand),
    /// Manage webhooks
    #[command(subcommand)]
    Webhooks(WebhooksCommand),
    /// Phone verifications
    #[command(subcommand)]
    Verify(VerifyCommand),
}

#[derive(Subcommand)]
enum TeamsCommand {
    /// List your teams
    List,
    /// Show the currently active team
    Current,
    /// Switch the active team (or back to `personal`)
    Switch {
        /// Team ID, slug, or name; `personal` clears the selection
        team: Option<String>,
    },
    /// Create a new team
    Create {
        /// Team name
        #[arg(short, long)]
        name: String,
        /// Team description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List members of the current team
    Members,
    /// Invite a member to the current team
    Invite {
        /// Email address to invite
        email: String,
        /// Role to assign
        #[arg(short, long, default_value = "member", value_parser = ["admin", "member", "viewer"])]
        role: String,
    },
}

#[derive(Subcommand)]
enum KeysCommand {
    /// List your API keys
    List,
    /// Get details of a specific API key
    Get {
        /// API key ID
        id: String,
    },
    /// Get usage statistics for an API key
    Usage {
        /// API key ID
        id: String,
    },
}

#[derive(Subcommand)]
enum CampaignsCommand {
    /// Get campaign details
    Get {
        /// Campaign ID
        id: String,
    },
    /// Preview campaign cost and recipients
    Preview {
        /// Campaign ID
        id: String,
    },
}

#[derive(Subcommand)]
enum WebhooksCommand {
    /// Get webhook details
    Get {
        /// Webhook ID
        id: String,
    },
    /// Delete a webhook
    Delete {
        /// Webhook ID
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Send a test event to a webhook
    Test {
        /// Webhook ID
        id: String,
    },
    /// View webhook delivery history
    Deliveries {
        /// Webhook ID
        id: String,
        /// Number of deliveries to show
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
        /// Show only failed deliveries
        #[arg(long)]
        failed_only: bool,
    },
}

#[derive(Subcommand)]
enum VerifyCommand {
    /// List recent verifications
    List {
        /// Number of verifications per page
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
        /// Page number (starts at 1)
        #[arg(short, long)]
        page: Option<u32>,
        /// Filter by status (pending, verified, expired, failed)
        #[arg(short, long)]
        status: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let json = cli.json;

    match cli.command {
        Command::Login { api_key } => commands::login::run(api_key, json).await,
        Command::Logout => commands::logout::run(json).await,
        Command::Whoami => commands::whoami::run(json),
        Command::Onboarding => commands::onboarding::run().await,
        Command::Teams(cmd) => match cmd {
            TeamsCommand::List => commands::teams::list(json).await,
            TeamsCommand::Current => commands::teams::current(json),
            TeamsCommand::Switch { team } => commands::teams::switch(team, json).await,
            TeamsCommand::Create { name, description } => {
                commands::teams::create(name, description, json).await
            }
            TeamsCommand::Members => commands::teams::members(json).await,
            TeamsCommand::Invite { email, role } => {
                commands::teams::invite(email, role, json).await
            }
        },
        Command::Keys(cmd) => match cmd {
            KeysCommand::List => commands::keys::list(json).await,
            KeysCommand::Get { id } => commands::keys::get(id, json).await,
            KeysCommand::Usage { id } => commands::keys::usage(id, json).await,
        },
        Command::Campaigns(cmd) => match cmd {
            CampaignsCommand::Get { id } => commands::campaigns::get(id, json).await,
            CampaignsCommand::Preview { id } => commands::campaigns::preview(id, json).await,
        },
        Command::Webhooks(cmd) => match cmd {
            WebhooksCommand::Get { id } => commands::webhooks::get(id, json).await,
            WebhooksCommand::Delete { id, yes } => {
                commands::webhooks::delete(id, yes, json).await
            }
            WebhooksCommand::Test { id } => commands::webhooks::test(id, json).await,
            WebhooksCommand::Deliveries {
                id,
                limit,
                failed_only,
            } => commands::webhooks::deliveries(id, limit, failed_only, json).await,
        },
        Command::Verify(cmd) => match cmd {
            VerifyCommand::List {
                limit,
                page,
                status,
            } => commands::verify::list(limit, page, status, json).await,
        },
    }
}
