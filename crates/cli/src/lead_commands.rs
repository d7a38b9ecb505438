//! Direct messages, templates and lead simulation.

use {
    anyhow::{Context, Result, bail},
    clap::Args,
    leadflow_channels::ChannelRegistry,
    leadflow_config::LeadflowConfig,
    leadflow_notify::{
        DirectMessenger, Dispatcher, LeadDesk, LeadSimulator, NewLeadInput, TemplateCatalog,
        build_client, substitute_product,
    },
    leadflow_telegram::BotApiClient,
    std::{sync::Arc, time::Duration},
    tokio::time::{Instant, interval_at},
    tracing::{debug, info},
};

use crate::output::print_report;

#[derive(Args)]
pub struct SendArgs {
    /// Target chat id.
    #[arg(long)]
    chat_id: String,
    /// Template id (see `leadflow templates`).
    #[arg(long, conflicts_with = "message", required_unless_present = "message")]
    template: Option<String>,
    /// Free text; `[PRODUCT]` is substituted as in templates.
    #[arg(long)]
    message: Option<String>,
    /// Product for the `[PRODUCT]` placeholder.
    #[arg(long)]
    product: Option<String>,
}

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of leads to generate.
    #[arg(long, default_value_t = 5)]
    count: usize,
    /// Seed for a reproducible sequence.
    #[arg(long)]
    seed: Option<u64>,
    /// Also convert every generated lead with a random amount.
    #[arg(long, default_value_t = false)]
    convert: bool,
    /// Print the leads without dispatching anything.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Keep monitoring until Ctrl-C: each tick yields a lead with 15% probability.
    #[arg(long, default_value_t = false, conflicts_with_all = ["dry_run", "count"])]
    watch: bool,
    /// Seconds between monitoring ticks with `--watch`.
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    interval: u64,
}

fn bot_client(config: &LeadflowConfig) -> Result<Option<BotApiClient>> {
    Ok(BotApiClient::from_config(build_client(&config.http)?, &config.telegram))
}

pub async fn handle_send(config: &LeadflowConfig, args: SendArgs) -> Result<()> {
    let text = match (&args.template, &args.message) {
        (Some(id), _) => TemplateCatalog::builtin()
            .get(id)
            .with_context(|| format!("unknown template: {id}"))?
            .render(args.product.as_deref()),
        (None, Some(message)) => substitute_product(message, args.product.as_deref()),
        (None, None) => bail!("either --template or --message is required"),
    };
    if text.trim().is_empty() {
        bail!("message is empty");
    }
    let Some(client) = bot_client(config)? else {
        bail!("bot API is not configured (set LEADFLOW_TELEGRAM_BOT_TOKEN)");
    };
    client
        .send_message(&args.chat_id, &text, None)
        .await
        .context("sending message")?;
    println!("sent to {}", args.chat_id);
    Ok(())
}

pub fn print_templates() {
    for template in TemplateCatalog::builtin().iter() {
        println!("[{}] {} ({}, trigger: {})", template.id, template.name, template.category, template.trigger);
        println!("    {}", template.body);
    }
}

async fn announce(
    desk: &mut LeadDesk,
    sim: &mut LeadSimulator,
    input: NewLeadInput,
    convert: bool,
) -> Result<()> {
    let (lead, report) = desk.detect_lead(input).await;
    println!("lead {} {}", lead.id, lead.name);
    print_report(&report);
    if convert {
        let report = desk.convert_lead(&lead.id, sim.revenue()).await?;
        print_report(&report);
    }
    Ok(())
}

pub async fn handle_simulate(config: &LeadflowConfig, args: SimulateArgs) -> Result<()> {
    let mut sim = match args.seed {
        Some(seed) => LeadSimulator::seeded(seed),
        None => LeadSimulator::from_entropy(),
    };

    if args.dry_run {
        for _ in 0..args.count {
            let lead = sim.next_lead();
            println!(
                "{} ({}) interested in {} via {}",
                lead.name,
                lead.chat_id,
                lead.product.as_deref().unwrap_or("-"),
                lead.source
            );
        }
        return Ok(());
    }

    let http = build_client(&config.http)?;
    let registry = Arc::new(ChannelRegistry::load(config));
    let dispatcher = Arc::new(Dispatcher::standard(registry, http.clone()));
    let bot = BotApiClient::from_config(http, &config.telegram)
        .map(|c| Arc::new(c) as Arc<dyn DirectMessenger>);
    let mut desk = LeadDesk::new(dispatcher, bot, TemplateCatalog::builtin());

    if args.watch {
        let period = Duration::from_secs(args.interval);
        let mut ticker = interval_at(Instant::now() + period, period);
        info!(interval_secs = args.interval, "monitoring for leads, Ctrl-C to stop");
        loop {
            tokio::select! {
                _ = ticker.tick() => {},
                _ = tokio::signal::ctrl_c() => break,
            }
            match sim.tick() {
                Some(input) => announce(&mut desk, &mut sim, input, args.convert).await?,
                None => debug!("no lead this tick"),
            }
        }
    } else {
        for _ in 0..args.count {
            let input = sim.next_lead();
            announce(&mut desk, &mut sim, input, args.convert).await?;
        }
    }

    let stats = desk.stats();
    info!(leads = stats.leads, conversions = stats.conversions, revenue = stats.revenue, "simulation finished");
    println!(
        "leads: {}  conversions: {}  revenue: €{:.2}",
        stats.leads, stats.conversions, stats.revenue
    );
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, clap::Parser};

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        simulate: SimulateArgs,
    }

    #[test]
    fn watch_defaults_to_thirty_second_ticks() {
        let parsed = Harness::try_parse_from(["simulate", "--watch", "--seed", "4"]).unwrap();
        assert!(parsed.simulate.watch);
        assert_eq!(parsed.simulate.interval, 30);
        assert_eq!(parsed.simulate.seed, Some(4));
    }

    #[test]
    fn watch_rejects_conflicting_flags() {
        assert!(Harness::try_parse_from(["simulate", "--watch", "--dry-run"]).is_err());
        assert!(Harness::try_parse_from(["simulate", "--watch", "--count", "3"]).is_err());
        assert!(Harness::try_parse_from(["simulate", "--watch", "--interval", "0"]).is_err());
        assert!(Harness::try_parse_from(["simulate", "--watch", "--interval", "5", "--convert"]).is_ok());
    }
}
