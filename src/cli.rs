//! Command-line surface over the demo sandbox

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

use crate::config::Config;
use crate::effects::layout::apply_order;
use crate::effects::BackgroundPreset;
use crate::funnel::FunnelMode;
use crate::industry::{IndustryId, profiles};
use crate::sandbox::Sandbox;
use crate::storage::{DemoStorage, FileStore, TokioScheduler};

#[derive(Debug, Parser)]
#[command(name = "demo-effects", version, about = "Inspect and drive the demo sandbox state")]
pub struct Cli {
    /// Storage file (overrides the config)
    #[arg(long, global = true, value_name = "PATH")]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List industry profiles
    Industries,
    /// Print the composed page state
    Effective {
        #[arg(long)]
        json: bool,
    },
    /// Select an industry, or `none`
    Industry { id: String },
    /// Edit mode draft
    Edit {
        #[command(subcommand)]
        action: EditAction,
    },
    /// Background lab
    Background {
        #[command(subcommand)]
        action: BackgroundAction,
    },
    /// Funnel simulator
    Funnel {
        #[command(subcommand)]
        action: Option<FunnelAction>,
    },
    /// Remove all stored demo data
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum EditAction {
    Title { text: String },
    Subtitle { text: String },
    Save,
    Reset,
    /// Show the page as seen with the editor open
    Open,
    /// Show the page as seen with the editor closed
    Close,
    Status,
}

#[derive(Debug, Subcommand)]
pub enum BackgroundAction {
    Show,
    Preset { name: BackgroundPreset },
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum FunnelAction {
    Show,
    Mode { mode: FunnelMode },
    Traffic {
        #[arg(value_parser = parse_visitors)]
        visitors: f64,
    },
    Reset,
}

/// Open the file-backed sandbox, run `cli.command` and flush pending writes
///
/// Must run inside a `tokio::task::LocalSet`.
pub fn run(cli: Cli, config: &Config) -> Result<()> {
    let path = config.storage_path(cli.storage.as_deref());
    let backend = FileStore::open(&path).with_context(|| format!("Failed to open storage at {:?}", path))?;
    info!("Using storage file {:?}", backend.path());
    let storage = DemoStorage::new(Rc::new(backend)).with_schema_version(config.schema_version);
    let sandbox = Sandbox::open(storage, Rc::new(TokioScheduler));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&sandbox, cli.command, &mut out)?;
    sandbox.flush();
    Ok(())
}

pub fn execute(sandbox: &Sandbox, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Industries => {
            let current = sandbox.industry.industry();
            for profile in profiles() {
                let marker = if Some(profile.id) == current { "*" } else { " " };
                writeln!(
                    out,
                    "{} {:<14} {:<28} leads: {}",
                    marker,
                    profile.id.as_str(),
                    profile.display_name,
                    profile.labels.leads
                )?;
            }
        }
        Command::Effective { json } => {
            if json {
                let state = sandbox.effects().get_state();
                writeln!(out, "{}", serde_json::to_string_pretty(&*state)?)?;
            } else {
                print_summary(sandbox, out)?;
            }
        }
        Command::Industry { id } => {
            let id = parse_industry(&id)?;
            sandbox.industry.set_industry(id);
            print_summary(sandbox, out)?;
        }
        Command::Edit { action } => edit(sandbox, action, out)?,
        Command::Background { action } => {
            match action {
                BackgroundAction::Show => {}
                BackgroundAction::Preset { name } => sandbox.background.apply_preset(name),
                BackgroundAction::Reset => sandbox.background.reset(),
            }
            let report = serde_json::json!({
                "config": sandbox.background.config(),
                "wave": sandbox.background.wave_params(),
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
        Command::Funnel { action } => {
            match action.unwrap_or(FunnelAction::Show) {
                FunnelAction::Show => {}
                FunnelAction::Mode { mode } => sandbox.funnel.set_mode(mode),
                FunnelAction::Traffic { visitors } => sandbox.funnel.set_traffic(visitors),
                FunnelAction::Reset => sandbox.funnel.reset(),
            }
            print_funnel(sandbox, out)?;
        }
        Command::Clear => {
            sandbox.clear();
            writeln!(out, "Cleared all demo data")?;
        }
    }
    Ok(())
}

fn parse_visitors(raw: &str) -> std::result::Result<f64, String> {
    let visitors: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if !visitors.is_finite() {
        return Err(format!("'{raw}' is not a finite number"));
    }
    Ok(visitors)
}

fn parse_industry(raw: &str) -> Result<Option<IndustryId>> {
    if raw.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    Ok(Some(raw.parse()?))
}

fn edit(sandbox: &Sandbox, action: EditAction, out: &mut impl Write) -> Result<()> {
    let session = &sandbox.edit_mode;
    match action {
        EditAction::Title { text } => session.set_hero_title(text),
        EditAction::Subtitle { text } => session.set_hero_subtitle(text),
        EditAction::Save => session.save(),
        EditAction::Reset => session.reset(),
        EditAction::Open => {
            session.set_active(true);
            return print_summary(sandbox, out);
        }
        EditAction::Close => {
            session.set_active(false);
            return print_summary(sandbox, out);
        }
        EditAction::Status => {}
    }

    let draft = session.draft();
    writeln!(out, "status:   {}", if session.is_dirty() { "unsaved changes" } else { "saved" })?;
    writeln!(out, "title:    {}", draft.content.hero.title)?;
    writeln!(out, "subtitle: {}", draft.content.hero.subtitle)?;
    if !draft.change_log.is_empty() {
        writeln!(out, "changes:")?;
        for entry in &draft.change_log {
            writeln!(out, "  - {}", entry.label)?;
        }
    }
    Ok(())
}

fn print_summary(sandbox: &Sandbox, out: &mut impl Write) -> Result<()> {
    let state = sandbox.effects().get_state();
    let content = &state.content.effective;
    let industry = state.industry_id.map(|id| id.to_string()).unwrap_or_else(|| "none".to_string());
    let cards = apply_order(&content.demos.cards, &state.layout.demos_order, |c| c.id.as_str());

    writeln!(out, "industry:  {}", industry)?;
    writeln!(out, "editing:   {}", if state.flags.edit_mode_active { "open" } else { "closed" })?;
    writeln!(out, "hero:      {}", content.hero.title)?;
    writeln!(out, "           {}", content.hero.subtitle)?;
    writeln!(out, "cta:       {} / {}", content.cta.primary, content.cta.secondary)?;
    writeln!(out, "sections:  {}", state.layout.ordered_sections().join(", "))?;
    let titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
    writeln!(out, "cards:     {}", titles.join(", "))?;
    for (name, value) in state.css_variables() {
        writeln!(out, "{}: {}", name, value)?;
    }
    Ok(())
}

fn print_funnel(sandbox: &Sandbox, out: &mut impl Write) -> Result<()> {
    let report = sandbox.funnel.report();
    writeln!(out, "mode:      {}", report.mode)?;
    for stage in &report.stages {
        writeln!(out, "{:<14} {:>10}", stage.label, format_count(stage.value))?;
    }
    let labels = sandbox.effects().read(|s| s.labels.clone());
    writeln!(out, "{}: ${}", labels.revenue, format_count(report.revenue))?;
    writeln!(out, "spend:     ${}", format_count(report.spend))?;
    writeln!(out, "ROAS:      {:.2}x", report.roas)?;
    writeln!(out, "quality:   {} ({:.2})", report.quality, report.quality_score)?;
    Ok(())
}

/// Round to a whole number with thousands separators
fn format_count(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        grouped.insert(0, '-');
    }
    grouped
}
