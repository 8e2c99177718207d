use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use studio_press::application::AppContext;
use studio_press::application::services::image_coordinator::ImageLoadCoordinator;
use studio_press::application::use_cases::LeadError;
use studio_press::domain::entities::{ContactRequest, ImageLoadState, NewsletterSignup, PostId};
use studio_press::domain::ports::RelayReceipt;
use studio_press::infrastructure::config::LoadedConfig;
use studio_press::infrastructure::{AppConfig, CliArgs, Command, ConfigLoader};
use studio_press::presentation::{App, install_panic_hook};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<LoadedConfig> {
    let mut loaded = ConfigLoader::new()?.load(args.config.as_deref())?;
    loaded.config.remote.apply_env();
    loaded.config.merge_with_args(args);
    Ok(loaded)
}

fn print_receipt(receipt: &RelayReceipt) {
    match &receipt.reference {
        Some(reference) => println!("Submitted {} form (reference {reference})", receipt.form),
        None => println!("Submitted {} form", receipt.form),
    }
}

fn lead_report(error: LeadError) -> color_eyre::Report {
    match error {
        LeadError::Invalid(fields) => {
            for field in &fields {
                eprintln!("  {}: {}", field.field, field.message);
            }
            eyre!("{} field(s) invalid", fields.len())
        }
        LeadError::Relay(e) => eyre!(e).wrap_err("form relay failed"),
    }
}

async fn run_command(ctx: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::List => {
            let posts = ctx.content.list_posts().await?;
            if posts.demo {
                println!("(demo data: the content store is unreachable)");
            }
            for post in &posts.value {
                let state = if post.is_published() { "published" } else { "draft" };
                println!(
                    "{:<38} {:<9} {:<16} {}",
                    post.id.as_str(),
                    state,
                    post.fields.category,
                    post.title()
                );
            }
            println!("{} post(s) from {} storage", posts.value.len(), ctx.content.backend());
        }
        Command::Show { id } => {
            let post = ctx.content.get_post(&PostId::new(id.as_str())).await?;
            if post.demo {
                println!("(demo data: the content store is unreachable)");
            }
            let Some(post) = post.value else {
                return Err(eyre!("no post with id {id}"));
            };
            println!("{}", post.title());
            println!(
                "{} | {} | {}",
                post.fields.category,
                post.fields.read_time.as_deref().unwrap_or("-"),
                post.updated_at.format("%Y-%m-%d %H:%M")
            );
            println!();
            println!("{}", post.fields.body);
        }
        Command::Contact {
            name,
            email,
            company,
            message,
        } => {
            let request = ContactRequest {
                name,
                email,
                company,
                message,
            };
            let receipt = ctx.submit_lead().contact(&request).await.map_err(lead_report)?;
            print_receipt(&receipt);
        }
        Command::Subscribe { email } => {
            let receipt = ctx
                .submit_lead()
                .subscribe(&NewsletterSignup { email })
                .await
                .map_err(lead_report)?;
            print_receipt(&receipt);
        }
        Command::CheckImage { url, label } => {
            let slot = ImageLoadCoordinator::resolve(
                ctx.images.as_ref(),
                &ctx.fallbacks(),
                &url,
                label,
                Some(&ctx.recorder),
            )
            .await;
            match slot.state() {
                ImageLoadState::Loaded {
                    attempt,
                    width,
                    height,
                } => println!("loaded {width}x{height} from {} ({attempt:?})", slot.current_url()),
                ImageLoadState::Error => println!("failed: {}", slot.caption()),
                other => println!("unfinished: {other:?}"),
            }
        }
        Command::Analytics => {
            let summary = ctx.content.analytics_summary().await?;
            if summary.demo {
                println!("(demo data)");
            }
            let summary = summary.value;
            println!("page views       {}", summary.page_views);
            println!("unique visitors  {}", summary.unique_visitors);
            println!("lead submissions {}", summary.lead_submissions);
            for page in &summary.top_pages {
                println!("  {:<30} {}", page.path, page.views);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    let args = CliArgs::parse();
    let LoadedConfig {
        config,
        source,
        repaired,
    } = load_config(&args)?;
    init_logging(&config)?;

    info!(version = studio_press::VERSION, config = %source, "Starting {}", studio_press::NAME);
    for setting in repaired {
        warn!(setting, "Unusable config value replaced by its default");
    }

    let ctx = AppContext::init(config).wrap_err("failed to initialise")?;

    if let Some(command) = args.command {
        let result = run_command(&ctx, command).await;
        ctx.shutdown();
        return result;
    }

    let app = App::new(ctx);
    let mut terminal = ratatui::init();
    install_panic_hook();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    result
}
