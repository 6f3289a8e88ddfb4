use chrono::Local;
use std::io::{BufRead, Write as _};
use tracing::{error, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

mod controller;

use controller::WalletApp;

/// Custom formatter that doesn't include span context but adds timestamp and module
struct SimpleFmt;

impl<S, N> FormatEvent<S, N> for SimpleFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        // Write timestamp
        write!(writer, "{} ", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;

        // Write level
        let level = event.metadata().level();
        match *level {
            Level::ERROR => write!(writer, "ERROR ")?,
            Level::WARN => write!(writer, "WARN  ")?,
            Level::INFO => write!(writer, "INFO  ")?,
            Level::DEBUG => write!(writer, "DEBUG ")?,
            Level::TRACE => write!(writer, "TRACE ")?,
        }

        // Write full module path
        let target = event.metadata().target();
        write!(writer, "[{}] ", target)?;

        // Write the message without any span context
        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(SimpleFmt)
        .with_ansi(false);

    let subscriber = tracing_subscriber::registry().with(filter).with(fmt_layer);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

const HELP: &str = "\
Commands:
  create-wallet     Create a passkey wallet
  load-wallet       Recover the passkey wallet from two signed challenges
  create-multisig   Create a 2-of-2 multisig wallet (passkey + fixed key)
  load-multisig     Recover the multisig wallet
  faucet            Request test tokens for the active address
  balance           Fetch the active address balance
  create-tx         Build a transaction draft (gas price 1000, budget 2000000)
  sign-tx           Sign the current draft
  send-tx           Submit the signed draft
  status            Show session, balance and transaction state
  help              Show this help
  quit              Exit";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing()?;

    let mut app = WalletApp::new()?;
    println!("Sui passkey wallet. Type 'help' for commands.");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let command = line.trim();

        // One command at a time; the prompt does not return until the
        // command finishes, which is the CLI version of a disabled button.
        let result = match command {
            "" => Ok(()),
            "create-wallet" => app.create_wallet().await,
            "load-wallet" => app.load_wallet().await,
            "create-multisig" => app.create_multisig().await,
            "load-multisig" => app.load_multisig().await,
            "faucet" => app.request_faucet().await,
            "balance" => {
                app.fetch_balance().await;
                Ok(())
            }
            "create-tx" => app.create_transaction().await,
            "sign-tx" => app.sign_transaction().await,
            "send-tx" => app.send_transaction().await,
            "status" => {
                app.status();
                Ok(())
            }
            "help" => {
                println!("{}", HELP);
                Ok(())
            }
            "quit" | "exit" => break,
            unknown => {
                println!("Unknown command '{}'. Type 'help' for commands.", unknown);
                Ok(())
            }
        };

        // Failures leave the previous state intact; report and keep going.
        if let Err(e) = result {
            error!("{:#}", e);
        }
    }

    Ok(())
}
