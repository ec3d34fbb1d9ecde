//! # Interactive Chat
//!
//! A read-eval-print loop over any line source. `quit` ends the session and
//! prints its summary, `help` lists example questions, `stats` prints the
//! running counters and blank lines are skipped. End of input behaves like
//! `quit`.

use anyhow::Result;
use climate_qa::{templates::EXAMPLE_QUESTIONS, Assistant, Session, SessionSummary};
use std::io::{BufRead, Write};
use tracing::info;

const BANNER: &str = "CLIMATE EDUCATION ASSISTANT\nAsk me anything about climate change and sustainability.\nType 'quit' to exit, 'help' for examples, 'stats' for session counters.";

/// Runs the chat loop until `quit` or end of input, then ends the session.
pub async fn run_chat<R, W>(
    assistant: &Assistant,
    session: &mut Session,
    input: R,
    output: &mut W,
) -> Result<SessionSummary>
where
    R: BufRead,
    W: Write,
{
    writeln!(output, "{BANNER}")?;
    writeln!(output, "{}", "-".repeat(60))?;
    info!(session_id = %session.id(), "Chat started");

    let mut lines = input.lines();
    loop {
        write!(output, "\nYour question: ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let utterance = line.trim();

        match utterance.to_lowercase().as_str() {
            "" => continue,
            "quit" => break,
            "help" => {
                write_help(output)?;
                continue;
            }
            "stats" => {
                write_stats(session, output)?;
                continue;
            }
            _ => {}
        }

        let reply = assistant.process(session, utterance).await;
        let metadata = &reply.metadata;
        if metadata.is_in_domain {
            writeln!(
                output,
                "Climate topic detected (confidence: {:.2})",
                metadata.confidence
            )?;
        } else {
            writeln!(
                output,
                "Non-climate topic (confidence: {:.2})",
                metadata.confidence
            )?;
        }
        writeln!(output, "\nAssistant: {}", reply.text)?;
        if metadata.generation_time > 0.0 {
            writeln!(output, "Response time: {:.1}s", metadata.generation_time)?;
        }
    }

    let summary = assistant.finish_session(session);
    write_summary(&summary, output)?;
    Ok(summary)
}

fn write_help<W: Write>(output: &mut W) -> Result<()> {
    writeln!(output, "\nTry asking about:")?;
    for question in EXAMPLE_QUESTIONS {
        writeln!(output, "   - {question}")?;
    }
    Ok(())
}

fn write_stats<W: Write>(session: &Session, output: &mut W) -> Result<()> {
    let stats = session.stats();
    writeln!(output, "\nSession statistics:")?;
    writeln!(output, "   Questions asked: {}", stats.questions_asked)?;
    writeln!(output, "   Climate questions answered: {}", stats.climate_questions)?;
    writeln!(output, "   Questions redirected: {}", stats.rejected_questions)?;
    writeln!(
        output,
        "   Average response time: {:.1}s",
        stats.average_generation_time()
    )?;
    Ok(())
}

/// Prints the end-of-session report.
pub fn write_summary<W: Write>(summary: &SessionSummary, output: &mut W) -> Result<()> {
    writeln!(output, "\nSession Summary:")?;
    writeln!(output, "   Climate questions answered: {}", summary.answered)?;
    writeln!(output, "   Off-topic questions redirected: {}", summary.redirected)?;
    writeln!(
        output,
        "   Average response time: {:.1}s",
        summary.average_generation_time
    )?;
    writeln!(output, "Thanks for learning about climate!")?;
    Ok(())
}
