//! Vault CLI - operator interface for the Vault Africa data layer
//!
//! Signs users in and out, publishes and endorses posts, reads notifications
//! and composes the dashboard views against the configured storage scope.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use vault_applications::view::{DiscoverContent, OverviewPanel};
use vault_applications::{
    content::unread_badge, format_time_ago, score_category, NewPost, Section, VaultApplication,
    ViewFragment,
};
use vault_core::{
    init_logging, log_operation_error, log_operation_start, log_operation_success, Role, Theme,
    VaultConfig,
};

#[derive(Parser)]
#[command(name = "vault")]
#[command(about = "Operator interface to the Vault Africa data layer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Storage directory, overriding the configured one
    #[arg(long, global = true)]
    data_dir: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and start a session
    Signup {
        name: String,
        email: String,

        #[arg(short, long, default_value = "")]
        password: String,

        /// founder, investor or mentor
        #[arg(short, long, default_value = "founder")]
        role: Role,
    },

    /// Start a session; unknown emails are signed up
    Login {
        email: String,

        #[arg(short, long, default_value = "")]
        password: String,

        #[arg(short, long, default_value = "founder")]
        role: Role,
    },

    /// End the current session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Act in another role until the session ends
    SwitchRole { role: Role },

    /// Publish a post as the signed-in founder
    Post {
        title: String,
        content: String,

        #[arg(long)]
        category: Option<String>,

        /// Comma separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Roles allowed to see the post, comma separated; every role when omitted
        #[arg(long, value_delimiter = ',')]
        visible_to: Vec<Role>,
    },

    /// Posts visible to the current role
    Feed,

    /// Like or unlike a post
    Like { post_id: String },

    /// Save or unsave a founder (investors and mentors)
    SaveFounder { founder_id: String },

    /// Endorse a post (investors and mentors)
    Endorse { post_id: String },

    /// Count a share and print the share text
    Share { post_id: String },

    /// List notifications for the current user
    Notifications {
        /// Mark every listed notification read first
        #[arg(long)]
        mark_all_read: bool,
    },

    /// Mark one notification read
    Read { notification_id: String },

    /// Compose a dashboard section for the current role
    View {
        /// overview, feed, discover or profile
        #[arg(default_value = "overview")]
        section: Section,
    },

    /// Show the current user's vault score
    Score,

    /// Recent activity visible to the current role
    Activities,

    /// Show or change the colour theme
    Theme {
        #[arg(long)]
        toggle: bool,

        #[arg(long)]
        set: Option<Theme>,
    },

    /// Restore the demo posts, notifications and activities
    ResetDemo,

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,

        /// Validate current configuration
        #[arg(long)]
        validate: bool,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Signup { .. } => "signup",
            Commands::Login { .. } => "login",
            Commands::Logout => "logout",
            Commands::Whoami => "whoami",
            Commands::SwitchRole { .. } => "switch_role",
            Commands::Post { .. } => "post",
            Commands::Feed => "feed",
            Commands::Like { .. } => "like",
            Commands::SaveFounder { .. } => "save_founder",
            Commands::Endorse { .. } => "endorse",
            Commands::Share { .. } => "share",
            Commands::Notifications { .. } => "notifications",
            Commands::Read { .. } => "read",
            Commands::View { .. } => "view",
            Commands::Score => "score",
            Commands::Activities => "activities",
            Commands::Theme { .. } => "theme",
            Commands::ResetDemo => "reset_demo",
            Commands::Config { .. } => "config",
        }
    }
}

/// Prints either JSON or the human rendering
struct Output {
    json: bool,
}

impl Output {
    fn print<T: Serialize>(&self, value: &T, human: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            human(value);
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_path) = load_config(cli.config.as_ref()).await?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
        config.logging.filter_directives = vec![
            "vault_core=debug".to_string(),
            "vault_applications=debug".to_string(),
            "vault_cli=debug".to_string(),
        ];
    }

    init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    info!("Starting Vault CLI v{}", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Loaded configuration from {:?}", path),
        None => info!("No configuration file found, using defaults"),
    }

    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    if let Commands::Config {
        show,
        init,
        validate,
    } = cli.command
    {
        return handle_config(show, init, validate, &config).await;
    }

    let app = VaultApplication::new(config).context("Failed to open the storage scope")?;
    let output = Output { json: cli.json };

    let operation = cli.command.name();
    log_operation_start!(operation);
    match run(&app, cli.command, &output) {
        Ok(()) => {
            log_operation_success!(operation);
            Ok(())
        }
        Err(e) => {
            log_operation_error!(operation, e);
            Err(e)
        }
    }
}

async fn load_config(config_path: Option<&PathBuf>) -> Result<(VaultConfig, Option<PathBuf>)> {
    if let Some(path) = config_path {
        let config = VaultConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {:?}", path))?;
        return Ok((config, Some(path.clone())));
    }

    // Try to load from default locations
    let default_paths = [
        default_config_path(),
        dirs::home_dir().map(|d| d.join(".vault-africa").join("config.toml")),
        Some(PathBuf::from("vault.toml")),
    ];

    for path in default_paths.into_iter().flatten() {
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            let config = VaultConfig::from_file(&path)
                .with_context(|| format!("Failed to load configuration from {:?}", path))?;
            return Ok((config, Some(path)));
        }
    }

    Ok((VaultConfig::default(), None))
}

/// Get the default configuration file path
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|d| d.join(".config")))
        .map(|d| d.join("vault-africa").join("config.toml"))
}

async fn handle_config(show: bool, init: bool, validate: bool, config: &VaultConfig) -> Result<()> {
    if init {
        let config_path =
            default_config_path().context("Could not determine a configuration directory")?;
        if tokio::fs::try_exists(&config_path).await.unwrap_or(false) {
            bail!("Configuration already exists at {:?}", config_path);
        }

        VaultConfig::default().save_to_file(&config_path)?;
        println!("Configuration initialized at: {:?}", config_path);
    }

    if show || !(init || validate) {
        println!("{}", toml::to_string_pretty(config)?);
    }

    if validate {
        match config.validate() {
            Ok(()) => println!("Configuration is valid"),
            Err(e) => {
                println!("Configuration validation failed: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}

fn run(app: &VaultApplication, command: Commands, out: &Output) -> Result<()> {
    match command {
        Commands::Signup {
            name,
            email,
            password,
            role,
        } => {
            let session = app.signup(&name, &email, &password, role)?;
            out.print(&session, |s| {
                println!("Welcome to Vault, {}! Signed in as {}", s.user_name, s.user_role)
            })?;
        }

        Commands::Login {
            email,
            password,
            role,
        } => {
            let session = app.login(&email, &password, role)?;
            out.print(&session, |s| {
                println!("Welcome back, {}! Signed in as {}", s.user_name, s.user_role)
            })?;
        }

        Commands::Logout => {
            let ended = app.logout()?;
            out.print(&ended, |ended| {
                println!("{}", if *ended { "Logged out" } else { "No active session" })
            })?;
        }

        Commands::Whoami => match app.current_session() {
            Some(session) => {
                let user = app.current_user();
                let value = serde_json::json!({ "session": session, "user": user });
                out.print(&value, |_| {
                    let email = user.as_ref().map_or("unknown", |u| u.email.as_str());
                    println!("{} <{}>, acting as {}", session.user_name, email, session.user_role);
                    if let Some(user) = &user {
                        println!("Account role: {}", user.role);
                        println!("Vault score: {}", user.vault_score);
                    }
                })?;
            }
            None => out.print(&serde_json::Value::Null, |_| println!("Not signed in"))?,
        },

        Commands::SwitchRole { role } => {
            let session = app.switch_role(role)?;
            out.print(&session, |s| println!("Switched to {} dashboard", s.user_role))?;
        }

        Commands::Post {
            title,
            content,
            category,
            tags,
            visible_to,
        } => {
            let input = NewPost {
                category,
                tags,
                role_visible: (!visible_to.is_empty()).then_some(visible_to),
                ..NewPost::titled(title, content)
            };
            let post = app.add_post(input)?;
            out.print(&post, |p| println!("Published \"{}\" ({})", p.title, p.id))?;
        }

        Commands::Feed => {
            let fragment = app.compose_view(Section::Feed);
            out.print(&fragment, render)?;
        }

        Commands::Like { post_id } => {
            let Some(liked) = app.toggle_like(&post_id)? else {
                bail!("No post with id {}", post_id);
            };
            out.print(&liked, |liked| {
                println!("{}", if *liked { "Post liked!" } else { "Post unliked" })
            })?;
        }

        Commands::SaveFounder { founder_id } => {
            let saved = app.toggle_save_founder(&founder_id)?;
            out.print(&saved, |saved| {
                println!(
                    "{}",
                    if *saved {
                        "Founder saved!"
                    } else {
                        "Founder removed from saved"
                    }
                )
            })?;
        }

        Commands::Endorse { post_id } => {
            let Some(endorsement) = app.endorse_post(&post_id)? else {
                bail!("No post with id {}", post_id);
            };
            out.print(&endorsement.post, |p| {
                println!(
                    "Post endorsed! \"{}\" now has {} endorsements",
                    p.title, p.stats.endorsements
                )
            })?;
        }

        Commands::Share { post_id } => {
            let Some(text) = app.share_post(&post_id)? else {
                bail!("No post with id {}", post_id);
            };
            out.print(&serde_json::json!({ "text": text }), |_| println!("{}", text))?;
        }

        Commands::Notifications { mark_all_read } => {
            if mark_all_read {
                let changed = app.mark_all_read()?;
                info!(changed = changed, "Marked notifications read");
            }
            let notifications = app.notifications();
            let unread = app.unread_count();
            out.print(&notifications, |list| {
                println!("Notifications ({} unread)", unread_badge(unread));
                let now = Utc::now();
                for n in list {
                    let marker = if n.unread { "*" } else { " " };
                    println!(
                        "{} {} [{}] · {}",
                        marker,
                        n.title,
                        n.id,
                        format_time_ago(n.timestamp, now)
                    );
                    println!("    {}", n.message);
                }
            })?;
        }

        Commands::Read { notification_id } => {
            if !app.mark_notification_read(&notification_id)? {
                bail!("No notification with id {}", notification_id);
            }
            out.print(&true, |_| println!("Marked {} read", notification_id))?;
        }

        Commands::View { section } => {
            let fragment = app.compose_view(section);
            out.print(&fragment, render)?;
        }

        Commands::Score => {
            let Some(score) = app.vault_score()? else {
                bail!("Not signed in");
            };
            let category = score_category(score);
            out.print(
                &serde_json::json!({ "score": score, "category": category }),
                |_| println!("Vault score: {} ({})", score, category),
            )?;
        }

        Commands::Activities => {
            let activities = app.activities();
            out.print(&activities, |list| {
                let now = Utc::now();
                for a in list {
                    println!(
                        "{} · {} ({})",
                        a.content,
                        format_time_ago(a.timestamp, now),
                        a.kind
                    );
                }
            })?;
        }

        Commands::Theme { toggle, set } => {
            if let Some(theme) = set {
                app.set_theme(theme)?;
            } else if toggle {
                app.toggle_theme()?;
            }
            out.print(&app.theme(), |theme| println!("Theme: {}", theme))?;
        }

        Commands::ResetDemo => {
            app.reset_demo_data()?;
            out.print(&true, |_| println!("Demo data reset"))?;
        }

        // answered in main without opening a storage scope
        Commands::Config { .. } => bail!("config is not an application command"),
    }

    Ok(())
}

fn render(fragment: &ViewFragment) {
    match fragment {
        ViewFragment::Overview(view) => {
            println!("{}", view.banner.title);
            println!("{}", view.banner.subtitle);
            for stat in &view.stats {
                println!("  {:>6}  {}", stat.value, stat.label);
            }
            match &view.panel {
                OverviewPanel::Pipeline { title, stages }
                | OverviewPanel::DealFlow { title, stages } => {
                    println!("\n{}", title);
                    for stage in stages {
                        println!("  {:<24} {}", stage.label, stage.count);
                    }
                }
                OverviewPanel::MentorshipQueue { title, items } => {
                    println!("\n{}", title);
                    for item in items {
                        println!("  {}: {} [{}]", item.title, item.detail, item.action);
                    }
                }
            }
            let actions: Vec<&str> = view.quick_actions.iter().map(|a| a.label.as_str()).collect();
            println!("\nQuick actions: {}", actions.join(", "));
            println!("Notifications: {}", view.unread_badge);
        }
        ViewFragment::Feed(feed) => {
            if feed.items.is_empty() {
                println!("No posts visible to {}", feed.role);
            }
            for item in &feed.items {
                let marker = if item.liked { "*" } else { " " };
                let post = &item.post;
                println!(
                    "{} {} [{}] by {} · {}",
                    marker, post.title, post.id, post.author_name, item.time_ago
                );
                println!("    {}", post.content);
                println!(
                    "    {} likes · {} endorsements · {} shares",
                    post.stats.likes, post.stats.endorsements, post.stats.shares
                );
            }
        }
        ViewFragment::Discover(view) => {
            println!("{}", view.title);
            match &view.content {
                DiscoverContent::Connect { cards } => {
                    for card in cards {
                        println!("  {}: {} [{}]", card.title, card.description, card.action);
                    }
                }
                DiscoverContent::Candidates { cards, action } => {
                    for card in cards {
                        let saved = if card.saved { " (saved)" } else { "" };
                        println!(
                            "  {} [{}] score {}{}",
                            card.name, card.id, card.vault_score, saved
                        );
                        println!("    {} · {}", card.headline, action);
                    }
                }
            }
        }
        ViewFragment::Profile(profile) => {
            println!("{} ({}) · {}", profile.name, profile.role_label, profile.location);
            println!("{}", profile.about);
            if !profile.tags.is_empty() {
                println!("Tags: {}", profile.tags.join(", "));
            }
            for stat in &profile.stats {
                println!("  {:>6}  {}", stat.value, stat.label);
            }
            if let Some(category) = &profile.score_category {
                println!("Category: {}", category);
            }
        }
    }
}
