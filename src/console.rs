//! Line-oriented front-end: command parsing and plain-text rendering.

use crate::kernel::reactor::Reactor;
use crate::kernel::telemetry::metrics::TelemetrySnapshot;
use crate::memory::types::{
    InsightStatus, OriginStatus, Resolution, Role, SpeculativeHypothesis,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Say(String),
    Hypotheses,
    Insights,
    Origins,
    Profile,
    Stats,
    /// Index into the newest-first hypothesis listing.
    Resolve { index: usize, resolution: Resolution },
    Insight { index: usize, status: InsightStatus },
    Origin { index: usize, status: OriginStatus },
    Stop,
    Quit,
    Help,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Say(line.to_string());
        };

        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or("");
        let args: Vec<&str> = words.collect();

        match (name, args.as_slice()) {
            ("hypotheses", []) => Command::Hypotheses,
            ("insights", []) => Command::Insights,
            ("origins", []) => Command::Origins,
            ("profile", []) => Command::Profile,
            ("stats", []) => Command::Stats,
            ("stop", []) => Command::Stop,
            ("quit", []) | ("exit", []) => Command::Quit,
            ("help", []) => Command::Help,
            ("confirm", [n, side]) => match (parse_index(n), *side) {
                (Some(index), "primary") => Command::Resolve { index, resolution: Resolution::ConfirmedPrimary },
                (Some(index), "competing") => Command::Resolve { index, resolution: Resolution::ConfirmedCompeting },
                _ => Command::Invalid(line.to_string()),
            },
            ("reject", [n]) => match parse_index(n) {
                Some(index) => Command::Resolve { index, resolution: Resolution::RejectedAll },
                None => Command::Invalid(line.to_string()),
            },
            ("agree", [n]) => match parse_index(n) {
                Some(index) => Command::Insight { index, status: InsightStatus::Agreed },
                None => Command::Invalid(line.to_string()),
            },
            ("disagree", [n]) => match parse_index(n) {
                Some(index) => Command::Insight { index, status: InsightStatus::Disagreed },
                None => Command::Invalid(line.to_string()),
            },
            ("origin", [n, verdict]) => match (parse_index(n), *verdict) {
                (Some(index), "confirm") => Command::Origin { index, status: OriginStatus::Confirmed },
                (Some(index), "reject") => Command::Origin { index, status: OriginStatus::Rejected },
                _ => Command::Invalid(line.to_string()),
            },
            _ => Command::Invalid(line.to_string()),
        }
    }
}

/// Listings are 1-based on screen.
fn parse_index(s: &str) -> Option<usize> {
    s.parse::<usize>().ok().filter(|n| *n > 0).map(|n| n - 1)
}

pub const HELP: &str = "\
  <text>                         talk
  /hypotheses /insights /origins list records (newest first)
  /confirm <n> primary|competing resolve hypothesis n
  /reject <n>                    reject both sides of hypothesis n
  /agree <n> | /disagree <n>     judge insight n
  /origin <n> confirm|reject     judge origin n
  /profile                       synthesized theories
  /stats                         session counters
  /stop                          end the session
  /quit                          exit";

pub fn render_transcript_tail(reactor: &Reactor, count: usize) -> String {
    let turns = reactor.state.store().turns();
    turns
        .iter()
        .skip(turns.len().saturating_sub(count))
        .map(|t| match (t.role, t.classification) {
            (Role::Model, Some(c)) => format!("lens [{} DEPTH] > {}", c, t.content),
            (Role::Model, None) => format!("lens > {}", t.content),
            (Role::User, _) => format!("you > {}", t.content),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_hypothesis(index: usize, h: &SpeculativeHypothesis) -> String {
    let mut out = format!(
        "[{}] ({:?} shock, {})\n    primary:   {}\n    competing: {}\n    mechanism: {}",
        index + 1,
        h.shock_level,
        h.status.as_str(),
        h.primary_hypothesis,
        h.competing_hypothesis,
        h.mechanism_explanation,
    );
    if let Some(plan) = &h.adjustment_plan {
        out.push_str(&format!("\n    adjustment: {}", plan));
    }
    out
}

pub fn render_hypotheses(reactor: &Reactor) -> String {
    let hypotheses = reactor.state.store().hypotheses();
    if hypotheses.is_empty() {
        return "No hypotheses yet.".to_string();
    }
    hypotheses
        .iter()
        .enumerate()
        .map(|(i, h)| render_hypothesis(i, h))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_insights(reactor: &Reactor) -> String {
    let insights = reactor.state.store().insights();
    if insights.is_empty() {
        return "No insights yet.".to_string();
    }
    insights
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "[{}] ({:?}, {:.0}%) {}\n    shape: {}\n    prediction: {}",
                i + 1,
                r.status,
                r.confidence * 100.0,
                r.pattern,
                r.shape,
                r.future_prediction
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_origins(reactor: &Reactor) -> String {
    let origins = reactor.state.store().origins();
    if origins.is_empty() {
        return "No origins yet.".to_string();
    }
    origins
        .iter()
        .enumerate()
        .map(|(i, o)| {
            format!(
                "[{}] ({:?}, {:.0}%) {}\n    reasoning: {}",
                i + 1,
                o.status,
                o.confidence * 100.0,
                o.inference,
                o.reasoning
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_profile(reactor: &Reactor) -> String {
    let theories = reactor.synthesizer().theories();
    if theories.is_empty() {
        return "No profile theories.".to_string();
    }
    theories
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                "Theory {}: {}\n    competing: {}\n    logic: {}\n    evidence: {}",
                i + 1,
                t.theory,
                t.competing,
                t.logic,
                t.shock_evidence.join("; ")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_stats(reactor: &Reactor, snap: &TelemetrySnapshot) -> String {
    let pending = reactor.state.store().pending_counts();
    format!(
        "turns accepted {} / rejected {} / fallbacks {}\npending: {} insights, {} origins, {} hypotheses\nlast depth: {}",
        snap.turn_stats.accepted,
        snap.turn_stats.rejected,
        snap.turn_stats.fallbacks,
        pending.insights,
        pending.origins,
        pending.hypotheses,
        reactor
            .state
            .last_classification
            .map(|c| c.as_str())
            .unwrap_or("-"),
    )
}
