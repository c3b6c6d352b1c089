//! Headless demo player.
//!
//! Connects to a Mathrush server, answers arithmetic prompts as they
//! arrive, and optionally spends coins on skip-question powerups. Useful
//! for smoke-testing a server and for padding out a lobby:
//!
//! ```text
//! RUST_LOG=debug cargo run -p mathrush-bot -- --name robo --spend
//! ```

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mathrush::prelude::*;

#[derive(Parser)]
#[command(name = "mathrush-bot", about = "Headless Mathrush player")]
struct Args {
    /// Server hostname.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Display name to join with.
    #[arg(long, default_value = "robo")]
    name: String,

    /// Buy a skip-question powerup whenever the balance allows it.
    #[arg(long)]
    spend: bool,
}

#[tokio::main]
async fn main() -> Result<(), MathrushError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ClientConfig::new(args.host, args.port);
    let client = QuizClient::connect(&config, &args.name).await?;
    tracing::info!(name = %args.name, "joined, waiting for questions");

    let answerer = client.session().clone();
    client.session().on_event(EventKind::NewQuestion, move |event| {
        let ServerEvent::NewQuestion { question, .. } = event else {
            return;
        };
        match solve(question) {
            Some(answer) => {
                tracing::info!(%question, answer, "answering");
                if answerer.send_submit(answer).is_err() {
                    tracing::warn!("session closed mid-answer");
                }
            }
            None => tracing::warn!(%question, "prompt not arithmetic"),
        }
    });

    if args.spend {
        let buyer = client.session().clone();
        client
            .session()
            .on_event(EventKind::CorrectSubmission, move |event| {
                let ServerEvent::CorrectSubmission { coins, .. } = event
                else {
                    return;
                };
                let powerup = Powerup::SkipQuestion;
                if *coins >= powerup.cost() {
                    tracing::info!(%powerup, coins = *coins, "buying");
                    let _ = buyer.send_purchase(powerup, PlayerId(0));
                }
            });
    }

    let reason = client.wait_closed().await;
    let state = client.snapshot();
    tracing::info!(
        %reason,
        score = state.score,
        coins = state.coins,
        place = ?state.eliminated_place,
        "game over"
    );
    Ok(())
}

/// Evaluates prompts of the form `a op b` with op one of `+ - * × /`.
fn solve(prompt: &str) -> Option<i32> {
    let mut parts = prompt.split_whitespace();
    let a: i32 = parts.next()?.parse().ok()?;
    let op = parts.next()?;
    let b: i32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    match op {
        "+" => a.checked_add(b),
        "-" => a.checked_sub(b),
        "*" | "×" => a.checked_mul(b),
        "/" => a.checked_div(b),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::solve;

    #[test]
    fn test_solve_basic_arithmetic() {
        assert_eq!(solve("3 + 4"), Some(7));
        assert_eq!(solve("10 - 12"), Some(-2));
        assert_eq!(solve("6 × 7"), Some(42));
        assert_eq!(solve("9 / 3"), Some(3));
    }

    #[test]
    fn test_solve_rejects_what_it_cannot_parse() {
        assert_eq!(solve("what is love"), None);
        assert_eq!(solve("3 +"), None);
        assert_eq!(solve("3 + 4 + 5"), None);
        assert_eq!(solve("7 / 0"), None);
    }
}
