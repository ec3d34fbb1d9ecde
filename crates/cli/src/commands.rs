//! One-shot commands: `ask` answers a single question, `classify` shows how
//! an utterance would be routed without calling the generator.

use anyhow::Result;
use climate_qa::{
    config::get_config, errors::ConfigError, Assistant, IntentRouter, Lexicon, Session, Strategy,
};
use std::{io::Write, sync::Arc};
use tracing::warn;

/// Answers one question in a fresh session, as text or as JSON with metadata.
pub async fn ask<W: Write>(
    assistant: &Assistant,
    question: &str,
    json: bool,
    output: &mut W,
) -> Result<()> {
    let mut session = Session::new();
    let reply = assistant.process(&mut session, question).await;
    assistant.finish_session(&session);

    if json {
        writeln!(output, "{}", serde_json::to_string_pretty(&reply)?)?;
    } else {
        writeln!(output, "{}", reply.text)?;
    }
    Ok(())
}

/// Builds a router from the configured lexicon. Classification needs no
/// generator, so a missing default config file falls back to the built-in
/// lexicon. An explicitly named file must exist.
pub fn load_router(config_path: Option<&str>) -> Result<IntentRouter> {
    let (lexicon, science_bridge) = match get_config(config_path) {
        Ok(config) => (config.load_lexicon()?, config.science_bridge),
        Err(ConfigError::NotFound(message)) if config_path.is_none() => {
            warn!("{message} Using the built-in lexicon.");
            (Lexicon::built_in(), true)
        }
        Err(e) => return Err(e.into()),
    };
    Ok(IntentRouter::new(Arc::new(lexicon), science_bridge))
}

/// Prints the routing signals and the selected strategy for an utterance.
pub fn classify<W: Write>(router: &IntentRouter, utterance: &str, output: &mut W) -> Result<Strategy> {
    let (strategy, signals) = router.route(utterance);
    let verdict = &signals.verdict;

    writeln!(output, "Strategy:     {strategy}")?;
    writeln!(output, "In domain:    {}", verdict.is_in_domain)?;
    writeln!(output, "Confidence:   {:.3}", verdict.confidence)?;
    writeln!(output, "Reason:       {}", verdict.reason())?;
    if !verdict.matched_phrases.is_empty() {
        writeln!(output, "Matched:      {}", verdict.matched_phrases.join(", "))?;
    }
    match &signals.off_domain {
        Some(topic) => writeln!(
            output,
            "Off-domain:   {} ({})",
            topic.display_name(),
            topic.matched_phrases.join(", ")
        )?,
        None => writeln!(output, "Off-domain:   none")?,
    }
    if let Some(bridge) = &signals.science_bridge {
        writeln!(output, "Bridge topic: {}", bridge.topic)?;
    }
    if signals.greeting {
        writeln!(output, "Greeting:     yes")?;
    }
    if signals.compliment {
        writeln!(output, "Compliment:   yes")?;
    }
    Ok(strategy)
}
