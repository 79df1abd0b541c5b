//! One-shot commands: generate, list and health.

use crate::client::SyllabusClient;
use anyhow::Result;
use console::style;
use std::time::Instant;

pub async fn generate(client: &SyllabusClient, title: &str, level: Option<&str>) -> Result<()> {
    println!("{}", style(format!("Generating scenario for {:?}...", title)).dim());
    let started = Instant::now();
    let resp = client.generate(title, level).await?;

    println!();
    println!("{}", resp.scenario);
    println!();
    println!(
        "{} Generated in {:.1}s",
        style("✓").green().bold(),
        started.elapsed().as_secs_f64()
    );
    if let Some(id) = &resp.record_id {
        println!("  record:  {}", id);
    }
    if let Some(path) = &resp.file_path {
        println!("  file:    {}", path);
    }
    for warning in &resp.warnings {
        println!("{} {}", style("⚠").yellow().bold(), warning);
    }
    Ok(())
}

pub async fn scenarios(client: &SyllabusClient, limit: usize) -> Result<()> {
    let records = client.scenarios(limit).await?;
    if records.is_empty() {
        println!("No scenarios yet.");
        return Ok(());
    }

    for record in records {
        println!(
            "{} {} {}",
            style(format!("#{}", record.id)).bold(),
            style(&record.title).cyan(),
            style(format!("[{}] {}", record.level, record.created_at.format("%Y-%m-%d %H:%M"))).dim()
        );
        let preview: String = record.scenario.lines().next().unwrap_or("").chars().take(80).collect();
        println!("    {}", preview);
    }
    Ok(())
}

pub async fn titles(client: &SyllabusClient) -> Result<()> {
    for title in client.titles().await? {
        println!("{}", title);
    }
    Ok(())
}

pub async fn health(client: &SyllabusClient) -> Result<()> {
    let h = client.health().await?;
    let status = if h.status == "ok" {
        style(h.status.as_str()).green().bold()
    } else {
        style(h.status.as_str()).yellow().bold()
    };

    println!("syllabusd {}: {}", h.version, status);
    println!(
        "  backend:  {} ({})",
        h.backend.url,
        if h.backend.reachable { "reachable" } else { "unreachable" }
    );
    println!(
        "  model:    {} ({})",
        h.backend.model,
        if h.backend.model_present { "present" } else { "missing" }
    );
    println!(
        "  github:   {}",
        if h.file_host_configured { "configured" } else { "disabled" }
    );
    println!("  sessions: {}", h.active_sessions);
    Ok(())
}
