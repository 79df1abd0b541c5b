//! REPL - conversational intake against syllabusd
//!
//! Each line is sent as one turn of an intake session; the daemon drives the
//! questionnaire and runs generation when the last answer arrives.

use crate::client::SyllabusClient;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};
use syllabus_shared::Language;

const EXIT_WORDS: &[&str] = &["exit", "quit", "/exit", "/quit"];

fn print_prompt() {
    print!("{} ", style("you>").cyan().bold());
    let _ = io::stdout().flush();
}

fn print_messages(messages: &[String]) {
    for message in messages {
        println!("{} {}", style("syllabus>").green().bold(), message);
    }
}

/// Start the chat loop until EOF or an exit word
pub async fn start_repl(client: &SyllabusClient, language: Language) -> Result<()> {
    let opened = client.open_session(language).await?;
    let session_id = opened.session_id;

    println!(
        "{}",
        style(format!("Session {} ({}). Type 'exit' to leave.", session_id, language.label())).dim()
    );
    print_messages(&opened.messages);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_prompt();

        let input = match lines.next() {
            Some(Ok(line)) => line.trim().to_string(),
            Some(Err(e)) => {
                eprintln!("{} {}", style("Error reading input:").red(), e);
                continue;
            }
            None => break, // EOF
        };

        if input.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&input.to_lowercase().as_str()) {
            break;
        }

        match client.send(&session_id, &input).await {
            Ok(turn) => print_messages(&turn.messages),
            Err(e) => {
                eprintln!("{} {}", style("✗").red().bold(), e);
                break;
            }
        }
    }

    if let Err(e) = client.close_session(&session_id).await {
        eprintln!("{} {}", style("Warning:").yellow(), e);
    }
    println!("{}", style("Goodbye.").dim());
    Ok(())
}
