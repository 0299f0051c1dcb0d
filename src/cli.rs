//! Command-line front end. Each invocation is one page load.

use crate::app::App;
use crate::auth::{LoginCredentials, Registration};
use crate::cards::{find_template, Card, CardDraft, CardId, ColorOverrides};
use crate::clock::{iso_millis, SystemClock};
use crate::config::Config;
use crate::navigation::{Navigator, Page};
use crate::storage::FileStorage;
use anyhow::{anyhow, bail, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "portphelia", about = "Build your portfolio from cards")]
pub struct Args {
    #[arg(long, value_name = "FILE", help = "Storage file (overrides config and PORTPHELIA_STORAGE)")]
    pub storage: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Config file (default ~/.portphelia/config.toml)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (-v, -vv)")]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show who is signed in
    Status,
    /// Sign in (any password of sufficient length is accepted)
    Signin {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "PORTPHELIA_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Register a new account and sign in
    Signup {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "PORTPHELIA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Manage your cards
    Cards {
        #[command(subcommand)]
        action: CardsCommand,
    },
    /// Browse and use starter templates
    Templates {
        #[command(subcommand)]
        action: TemplatesCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum CardsCommand {
    List {
        #[arg(long, help = "Print cards as JSON")]
        json: bool,
    },
    Show {
        id: CardId,
    },
    Create {
        title: String,
        content: String,
        #[command(flatten)]
        colors: ColorArgs,
    },
    Update {
        id: CardId,
        title: String,
        content: String,
        #[command(flatten)]
        colors: ColorArgs,
    },
    Delete {
        id: CardId,
    },
    Duplicate {
        id: CardId,
    },
    /// Remove every card
    Clear {
        #[arg(long, help = "Confirm removal")]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplatesCommand {
    List,
    /// Create a card from a template (`template-3` or `3`)
    Use {
        template: String,
    },
}

#[derive(ClapArgs, Debug, Default)]
pub struct ColorArgs {
    #[arg(long, value_name = "COLOR")]
    pub background: Option<String>,
    #[arg(long = "title-color", value_name = "COLOR")]
    pub title_color: Option<String>,
    #[arg(long = "content-color", value_name = "COLOR")]
    pub content_color: Option<String>,
}

impl ColorArgs {
    fn overrides(&self) -> Option<ColorOverrides> {
        if self.background.is_none() && self.title_color.is_none() && self.content_color.is_none() {
            return None;
        }
        Some(ColorOverrides {
            background: self.background.clone(),
            title: self.title_color.clone(),
            content: self.content_color.clone(),
        })
    }

    fn draft(&self, title: &str, content: &str) -> CardDraft {
        let draft = CardDraft::new(title, content);
        match self.overrides() {
            Some(colors) => draft.with_colors(colors),
            None => draft,
        }
    }
}

impl Command {
    /// The entry page this command runs on.
    pub fn page(&self) -> Page {
        match self {
            Command::Status => Page::Home,
            Command::Signin { .. } => Page::SignIn,
            Command::Signup { .. } => Page::SignUp,
            Command::Logout | Command::Cards { .. } => Page::Design,
            Command::Templates { .. } => Page::Template,
        }
    }
}

/// Reports full page loads on stderr.
struct StderrNavigator;

fn navigation_line(page: Page) -> String {
    format!("Navigate: {}", page)
}

impl Navigator for StderrNavigator {
    fn navigate(&self, page: Page) {
        tracing::debug!(target_page = %page, "navigate");
        eprintln!("{}", navigation_line(page));
    }
}

fn print_card(card: &Card) {
    println!("{}  {}", card.id, card.title);
    println!("    {}", card.content);
    println!(
        "    colors: background {} | title {} | content {}",
        card.colors.background, card.colors.title, card.colors.content
    );
    println!(
        "    created {} | updated {}",
        iso_millis::format(&card.created_at),
        iso_millis::format(&card.updated_at)
    );
}

fn load_config(args: &Args) -> Result<Config> {
    let cfg = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Err(errors) = cfg.validate() {
        for err in &errors {
            eprintln!("Config error: {}", err);
        }
        bail!("Configuration has {} validation error(s)", errors.len());
    }
    Ok(cfg)
}

pub fn run(args: Args) -> Result<()> {
    let cfg = load_config(&args)?;
    let storage_path = cfg.resolve_storage_path(args.storage.as_deref());
    tracing::debug!(path = %storage_path.display(), "using storage");

    let page = args.command.page();
    let mut app = App::bootstrap(
        page,
        Arc::new(FileStorage::new(storage_path)),
        Arc::new(SystemClock),
        Box::new(StderrNavigator),
        &cfg,
    );

    match args.command {
        Command::Status => {
            let auth = app.auth();
            match auth.user() {
                Some(user) => println!("Signed in as {} <{}>", user.username, user.email),
                None => println!("Not signed in"),
            }
            Ok(())
        }
        Command::Signin {
            username,
            password,
            email,
        } => {
            if app.access().is_redirect() {
                println!("Already signed in as {}", app.auth().user_name());
                return Ok(());
            }
            let creds = LoginCredentials {
                username,
                password,
                email,
            };
            app.login(&creds)?;
            println!("Welcome, {}", app.auth().user_name());
            Ok(())
        }
        Command::Signup {
            username,
            email,
            password,
        } => {
            if app.access().is_redirect() {
                println!("Already signed in as {}", app.auth().user_name());
                return Ok(());
            }
            app.register(&Registration {
                username,
                email,
                password,
            })?;
            println!("Account created for {}", app.auth().user_name());
            Ok(())
        }
        Command::Logout => {
            if app.access().is_redirect() {
                println!("Not signed in");
                return Ok(());
            }
            app.logout();
            println!("Signed out");
            Ok(())
        }
        Command::Cards { action } => {
            require_signed_in(&app)?;
            run_cards(&mut app, action)
        }
        Command::Templates { action } => {
            require_signed_in(&app)?;
            run_templates(&mut app, action)
        }
    }
}

fn require_signed_in(app: &App) -> Result<()> {
    if app.access().is_redirect() {
        bail!("Not signed in. Run `portphelia signin` first.");
    }
    if !app.cards().card_error().is_empty() {
        eprintln!("Warning: {}", app.cards().card_error());
    }
    Ok(())
}

fn run_cards(app: &mut App, action: CardsCommand) -> Result<()> {
    let cards = app.cards_mut();
    match action {
        CardsCommand::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(cards.cards())?);
            } else if cards.card_count() == 0 {
                println!("No cards yet. Try `portphelia templates list`.");
            } else {
                for card in cards.cards() {
                    print_card(card);
                }
                println!("{} card(s)", cards.card_count());
            }
        }
        CardsCommand::Show { id } => {
            let card = cards
                .get_card_by_id(&id)
                .ok_or_else(|| anyhow!("Card not found"))?;
            print_card(card);
        }
        CardsCommand::Create {
            title,
            content,
            colors,
        } => {
            let card = cards.create_card(&colors.draft(&title, &content))?;
            println!("Created card {}", card.id);
        }
        CardsCommand::Update {
            id,
            title,
            content,
            colors,
        } => {
            let card = cards.update_card(&id, &colors.draft(&title, &content))?;
            println!("Updated card {}", card.id);
        }
        CardsCommand::Delete { id } => {
            cards.delete_card(&id)?;
            println!("Deleted card {}", id);
        }
        CardsCommand::Duplicate { id } => {
            let card = cards.duplicate_card(&id)?;
            println!("Created card {} ({})", card.id, card.title);
        }
        CardsCommand::Clear { yes } => {
            if !yes {
                bail!("Refusing to remove {} card(s) without --yes", cards.card_count());
            }
            cards.clear_cards()?;
            println!("All cards removed");
        }
    }
    Ok(())
}

fn run_templates(app: &mut App, action: TemplatesCommand) -> Result<()> {
    let cards = app.cards_mut();
    match action {
        TemplatesCommand::List => {
            for template in cards.get_template_cards() {
                println!("{}  {}", template.id, template.title);
                println!("    {}", template.content);
            }
        }
        TemplatesCommand::Use { template } => {
            let template =
                find_template(&template).ok_or_else(|| anyhow!("Unknown template '{}'", template))?;
            let card = cards.create_from_template(&template)?;
            println!("Created card {} from {}", card.id, template.id);
        }
    }
    Ok(())
}
