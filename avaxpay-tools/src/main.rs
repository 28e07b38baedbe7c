use std::{fmt, fs, path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use avaxpay_deeplink::{
    address::DEFAULT_SHORTEN_CHARS,
    format::{calculate_mrr, format_currency, interval_text},
    onramp::{FeeQuote, OnRampConfig},
    registry::Registry,
    shorten_address,
    units::NATIVE_DECIMALS,
    widget::{widget_pay_url, WidgetPayment, DEFAULT_APP_URL},
    BatchPaymentRequest, DeepLink, LinkCodec, PaymentRequest,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "avaxpay-tools", about = "Utility commands for AvaxPay payment links")]
struct Cli {
    /// Alternate registry JSON (defaults to the built-in Avalanche tables).
    #[arg(long, global = true, env = "AVAXPAY_REGISTRY_PATH")]
    registry: Option<PathBuf>,
    /// Print structured output as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a payment link.
    Encode(EncodeArgs),
    /// Decode a payment or batch link.
    Decode(DecodeArgs),
    /// Encode a batch payment link.
    BatchEncode(BatchEncodeArgs),
    /// Decode a batch payment link.
    BatchDecode(DecodeArgs),
    /// Monthly recurring revenue for one subscription.
    Mrr(MrrArgs),
    /// Describe a billing interval.
    Interval(IntervalArgs),
    /// Shorten an address for display.
    Shorten(ShortenArgs),
    /// Quote a fiat on-ramp purchase including fees.
    OnrampQuote(OnrampQuoteArgs),
    /// Build the hosted pay-page URL for an embedded button.
    WidgetUrl(WidgetUrlArgs),
}

#[derive(Args)]
struct EncodeArgs {
    #[arg(long)]
    to: String,
    #[arg(long)]
    amount: String,
    /// Token symbol or address; AVAX is omitted from the link.
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    label: Option<String>,
    #[arg(long)]
    memo: Option<String>,
    #[arg(long)]
    chain_id: Option<u64>,
    /// Also print a web link under this base URL.
    #[arg(long)]
    web: Option<String>,
}

#[derive(Args)]
struct DecodeArgs {
    link: String,
}

#[derive(Args)]
struct BatchEncodeArgs {
    /// Recipient address; repeat once per payment.
    #[arg(long = "recipient", required = true)]
    recipients: Vec<String>,
    /// Amount; repeat once per payment, in recipient order.
    #[arg(long = "amount", required = true)]
    amounts: Vec<String>,
    #[arg(long)]
    token: Option<String>,
    #[arg(long)]
    label: Option<String>,
}

#[derive(Args)]
struct MrrArgs {
    /// Amount per period in smallest units.
    #[arg(long)]
    amount_per_period: u128,
    /// Billing interval in seconds.
    #[arg(long)]
    interval: u64,
    /// Token decimals; 18 for AVAX, 6 for USDC/USDT.
    #[arg(long, default_value_t = NATIVE_DECIMALS)]
    decimals: u8,
}

#[derive(Args)]
struct IntervalArgs {
    seconds: u64,
}

#[derive(Args)]
struct ShortenArgs {
    address: String,
    #[arg(long, default_value_t = DEFAULT_SHORTEN_CHARS)]
    chars: usize,
}

#[derive(Args)]
struct OnrampQuoteArgs {
    /// Purchase amount in USD.
    amount: f64,
    #[arg(long, default_value = "usdc_avalanche")]
    currency: String,
}

#[derive(Args)]
struct WidgetUrlArgs {
    #[arg(long)]
    to: String,
    #[arg(long)]
    amount: String,
    #[arg(long, default_value = "AVAX")]
    token: String,
    #[arg(long, default_value = "Pay Now")]
    label: String,
    #[arg(long, env = "AVAXPAY_APP_URL", default_value = DEFAULT_APP_URL)]
    app_url: String,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    match cli.command {
        Commands::Encode(args) => encode(&load_codec(cli.registry)?, args, json),
        Commands::Decode(args) => decode(&load_codec(cli.registry)?, args, json),
        Commands::BatchEncode(args) => batch_encode(&load_codec(cli.registry)?, args, json),
        Commands::BatchDecode(args) => batch_decode(&load_codec(cli.registry)?, args, json),
        Commands::Mrr(args) => mrr(args, json),
        Commands::Interval(args) => {
            println!("{}", interval_text(args.seconds));
            Ok(())
        }
        Commands::Shorten(args) => {
            println!("{}", shorten_address(&args.address, args.chars));
            Ok(())
        }
        Commands::OnrampQuote(args) => onramp_quote(args, json),
        Commands::WidgetUrl(args) => widget_url(args),
    }
}

fn load_codec(path: Option<PathBuf>) -> Result<LinkCodec> {
    let registry = match path {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("failed to read registry {}", path.display()))?;
            let registry = Registry::from_json(&json)
                .with_context(|| format!("invalid registry {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded registry");
            registry
        }
        None => Registry::avalanche(),
    };
    Ok(LinkCodec::new(Arc::new(registry)))
}

fn encode(codec: &LinkCodec, args: EncodeArgs, json: bool) -> Result<()> {
    let mut request = PaymentRequest::new(args.to, args.amount);
    request.token = args.token;
    request.label = args.label;
    request.memo = args.memo;
    request.chain_id = args.chain_id;
    request.validate().context("refusing to encode invalid request")?;

    let summary = EncodedLinks {
        link: codec.encode_payment_link(&request),
        web_link: args
            .web
            .map(|base| codec.encode_web_link(&base, &request)),
    };
    output_summary(&summary, json)
}

fn decode(codec: &LinkCodec, args: DecodeArgs, json: bool) -> Result<()> {
    let link = codec.decode_link(&args.link).context("link invalid")?;
    output_summary(&DecodedLink { link, codec }, json)
}

fn batch_encode(codec: &LinkCodec, args: BatchEncodeArgs, json: bool) -> Result<()> {
    let mut request = BatchPaymentRequest::new(args.recipients, args.amounts)?;
    request.token = args.token;
    request.label = args.label;
    request.validate().context("refusing to encode invalid batch")?;

    let summary = EncodedLinks {
        link: codec.encode_batch_payment_link(&request)?,
        web_link: None,
    };
    output_summary(&summary, json)
}

fn batch_decode(codec: &LinkCodec, args: DecodeArgs, json: bool) -> Result<()> {
    let batch = codec
        .try_decode_batch_payment_link(&args.link)
        .context("link invalid")?;
    output_summary(
        &DecodedLink {
            link: DeepLink::Batch(batch),
            codec,
        },
        json,
    )
}

fn mrr(args: MrrArgs, json: bool) -> Result<()> {
    let summary = MrrSummary {
        mrr: calculate_mrr(args.amount_per_period, args.interval, args.decimals),
        interval: interval_text(args.interval),
    };
    output_summary(&summary, json)
}

fn onramp_quote(args: OnrampQuoteArgs, json: bool) -> Result<()> {
    let config = OnRampConfig::default();
    config.validate_amount(args.amount, &args.currency)?;
    output_summary(&QuoteSummary(config.quote(args.amount)), json)
}

fn widget_url(args: WidgetUrlArgs) -> Result<()> {
    let payment = WidgetPayment::new(args.to, args.amount)
        .with_token(args.token)
        .with_label(args.label);
    if let Err(e) = payment.validate() {
        bail!("invalid widget payment: {}", e);
    }
    println!("{}", widget_pay_url(&args.app_url, &payment)?);
    Ok(())
}

fn output_summary<T>(summary: &T, json: bool) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    if json {
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", summary);
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EncodedLinks {
    link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_link: Option<String>,
}

impl fmt::Display for EncodedLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.link)?;
        if let Some(web_link) = &self.web_link {
            writeln!(f, "{}", web_link)?;
        }
        Ok(())
    }
}

struct DecodedLink<'a> {
    link: DeepLink,
    codec: &'a LinkCodec,
}

impl Serialize for DecodedLink<'_> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.link.serialize(serializer)
    }
}

impl fmt::Display for DecodedLink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.codec.registry();
        match &self.link {
            DeepLink::Payment(request) => {
                writeln!(f, "type: payment")?;
                writeln!(f, "to: {}", request.to)?;
                writeln!(f, "amount: {}", request.amount)?;
                writeln!(f, "token: {}", request.token.as_deref().unwrap_or("AVAX (native)"))?;
                if let Some(label) = &request.label {
                    writeln!(f, "label: {}", label)?;
                }
                if let Some(memo) = &request.memo {
                    writeln!(f, "memo: {}", memo)?;
                }
                let chain_id = request
                    .chain_id
                    .unwrap_or_else(|| registry.default_chain_id());
                writeln!(f, "network: {} ({})", registry.chain_name(chain_id), chain_id)
            }
            DeepLink::Batch(batch) => {
                writeln!(f, "type: batch")?;
                writeln!(f, "token: {}", batch.token.as_deref().unwrap_or("AVAX (native)"))?;
                if let Some(label) = &batch.label {
                    writeln!(f, "label: {}", label)?;
                }
                writeln!(f, "payments: {}", batch.len())?;
                for (recipient, amount) in batch.payments() {
                    writeln!(f, "  {} {}", shorten_address(recipient, DEFAULT_SHORTEN_CHARS), amount)?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Serialize)]
struct MrrSummary {
    mrr: f64,
    interval: String,
}

impl fmt::Display for MrrSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "interval: {}", self.interval)?;
        writeln!(f, "mrr: {}", format_currency(self.mrr))
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct QuoteSummary(FeeQuote);

impl fmt::Display for QuoteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "amount: {}", format_currency(self.0.amount))?;
        writeln!(f, "fee: {}", format_currency(self.0.fee))?;
        writeln!(f, "total: {}", format_currency(self.0.total))
    }
}
