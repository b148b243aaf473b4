use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lens::config::{LensConfig, SessionConfig};
use lens::console::{self, Command, HELP};
use lens::kernel::event::Event;
use lens::services::llm::client::GeminiGateway;
use lens::Reactor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging
    let _ = dotenvy::dotenv();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // 2. Gateway + Session
    let config = LensConfig::from_env();
    let gateway = GeminiGateway::new(&config)?;
    let mut reactor = Reactor::new(Arc::new(gateway), SessionConfig::default());
    tracing::info!("Session open. turn model={} synthesis model={}", config.turn_model, config.synthesis_model);

    println!("Say something. /help lists commands.");

    // 3. Console loop: stdin lines and background results, one at a time
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                if !handle_command(&mut reactor, Command::parse(&line)) {
                    break;
                }
            }
            Some(event) = reactor.next_event() => {
                let turn_done = matches!(event, Event::TurnProcessed(_));
                let synthesized = matches!(event, Event::ProfileSynthesized(Some(_)));
                reactor.apply(event);
                if turn_done {
                    println!("{}", console::render_transcript_tail(&reactor, 1));
                }
                if synthesized {
                    println!("(profile ready: /profile)");
                }
            }
        }
    }

    // Let detached calls land before summarising; nothing is cancelled.
    reactor.settle().await;
    let summary = reactor.telemetry.aggregate_session(reactor.state.store());
    tracing::info!("Session summary: {:?}", summary);
    Ok(())
}

/// Returns false when the console should exit.
fn handle_command(reactor: &mut Reactor, command: Command) -> bool {
    match command {
        Command::Say(text) => {
            if !reactor.state.active {
                println!("(session stopped)");
            } else if reactor.state.turn_in_flight {
                println!("(still thinking, input dropped)");
            }
            reactor.submit(&text);
        }
        Command::Hypotheses => println!("{}", console::render_hypotheses(reactor)),
        Command::Insights => println!("{}", console::render_insights(reactor)),
        Command::Origins => println!("{}", console::render_origins(reactor)),
        Command::Profile => println!("{}", console::render_profile(reactor)),
        Command::Stats => {
            let snapshot = reactor.telemetry.snapshot();
            println!("{}", console::render_stats(reactor, &snapshot));
        }
        Command::Resolve { index, resolution } => {
            match reactor.state.store().hypotheses().nth(index).map(|h| h.id) {
                Some(id) => reactor.resolve_hypothesis(id, resolution),
                None => println!("No hypothesis {}", index + 1),
            }
        }
        Command::Insight { index, status } => {
            match reactor.state.store().insights().nth(index).map(|i| i.id) {
                Some(id) => reactor.set_insight_status(id, status),
                None => println!("No insight {}", index + 1),
            }
        }
        Command::Origin { index, status } => {
            match reactor.state.store().origins().nth(index).map(|o| o.id) {
                Some(id) => reactor.set_origin_status(id, status),
                None => println!("No origin {}", index + 1),
            }
        }
        Command::Stop => {
            reactor.stop();
            println!("Session stopped. /profile shows the synthesized profile once it lands.");
        }
        Command::Quit => return false,
        Command::Help => println!("{}", HELP),
        Command::Invalid(line) => println!("Unrecognised command: {} (try /help)", line),
    }
    true
}
