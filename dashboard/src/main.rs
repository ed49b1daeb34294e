use std::io::Write as _;

use async_trait::async_trait;
use log::error;

use agenda_dashboard::api::ApiClient;
use agenda_dashboard::dashboard::Dashboard;
use agenda_dashboard::error::{AppError, Result};
use agenda_dashboard::models::PersonPayload;
use agenda_dashboard::orchestrator::{AssignmentOutcome, OverridePrompt};
use agenda_dashboard::view::InvitationFilter;
use agenda_shared::conflict::ConflictLevel;
use agenda_shared::models::{ConflictBrief, Invitation};
use agenda_shared::time::{fmt_date, fmt_time, parse_date_flexible};

/// Terminal rendering of the override decision: print the verdict and
/// the overlapping invitations, then ask for a yes/no.
struct StdinPrompt;

#[async_trait]
impl OverridePrompt for StdinPrompt {
    async fn confirm_override(&self, level: ConflictLevel, conflicts: &[ConflictBrief]) -> bool {
        let title = match level {
            ConflictLevel::Hard => "Schedule conflict: already confirmed at the same time",
            ConflictLevel::Tight1h => "Warning: another invitation within 1 hour",
            ConflictLevel::Tight2h => "Warning: another invitation within 2 hours",
            ConflictLevel::None => return true,
        };

        println!("{}", title);
        for c in conflicts {
            println!(
                "  - {} {} - {} ({}) @ {}",
                c.date, c.time, c.event, c.status, c.venue
            );
        }
        print!("Assign anyway? [y/N] ");
        let _ = std::io::stdout().flush();

        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes" | "s" | "si" | "sí"
        )
    }
}

fn print_card(inv: &Invitation) {
    let proximity = match inv.days_until_event {
        Some(0) => " (today)",
        Some(1) | Some(2) => " (soon)",
        _ => "",
    };
    let clip = if inv.has_attachment() { " [file]" } else { "" };

    println!("#{} {} [{}]{}{}", inv.id, inv.event, inv.status, proximity, clip);
    println!(
        "    {} {} - {}",
        fmt_date(inv.date),
        fmt_time(inv.time),
        inv.convener
    );
    println!("    {} / {}", inv.municipality, inv.venue);
    let assignee = inv.assignee_label();
    if assignee.is_empty() {
        println!("    unassigned");
    } else if inv.role.is_empty() {
        println!("    attends: {}", assignee);
    } else {
        println!("    attends: {} ({})", assignee, inv.role);
    }
}

fn usage() -> AppError {
    AppError::validation(
        "usage: agenda-dashboard <command>\n\
         \x20 list [status]                                   list invitations\n\
         \x20 catalog                                         list people\n\
         \x20 counters                                        per-status totals\n\
         \x20 assign <invitation> <person> [role] [comment]   confirm an assignment\n\
         \x20 substitute <invitation> <person> [role] [comment]\n\
         \x20 cancel <invitation> [comment]\n\
         \x20 reactivate <invitation> [comment]\n\
         \x20 delete <invitation>\n\
         \x20 person-add <name> <title> [phone] [email] [unit]\n\
         \x20 person-del <person>\n\
         \x20 stats [from] [to]                               per-status counts for a range\n\
         \x20 export <path.xlsx>                              download confirmed report\n\
         \x20 health",
    )
}

fn parse_id(arg: Option<&String>, what: &str) -> Result<i64> {
    arg.and_then(|v| v.parse().ok())
        .ok_or_else(|| AppError::validation(format!("expected a numeric {}", what)))
}

async fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = args.first().map(String::as_str).ok_or_else(usage)?;

    let client = ApiClient::from_env()?;
    let mut dashboard = Dashboard::new(client, StdinPrompt);

    match command {
        "list" => {
            let mut filter = InvitationFilter::default();
            if let Some(raw) = args.get(1) {
                filter.status = Some(raw.parse().map_err(AppError::validation)?);
            }
            dashboard.apply_filter(filter).await?;
            for inv in dashboard.view.rows() {
                print_card(inv);
            }
            println!("{} invitations", dashboard.view.rows().len());
        }
        "catalog" => {
            dashboard.reload_catalog().await?;
            for p in dashboard.catalog.people() {
                println!("#{} {} - {} ({})", p.id, p.name, p.title, p.unit);
            }
        }
        "counters" => {
            let counts = dashboard.counters().await?;
            println!("pending     {}", counts.pending);
            println!("confirmed   {}", counts.confirmed);
            println!("substituted {}", counts.substituted);
            println!("cancelled   {}", counts.cancelled);
            if let Some(total) = counts.total {
                println!("total       {}", total);
            }
        }
        "assign" | "substitute" => {
            let invitation = parse_id(args.get(1), "invitation id")?;
            let person = parse_id(args.get(2), "person id")?;
            let role = args.get(3).cloned().unwrap_or_default();
            let comment = args.get(4..).map(|rest| rest.join(" ")).unwrap_or_default();

            let outcome = if command == "assign" {
                dashboard.assign(invitation, person, &role, &comment).await?
            } else {
                dashboard
                    .substitute(invitation, person, &role, &comment)
                    .await?
            };
            match outcome {
                AssignmentOutcome::Committed => println!("committed"),
                AssignmentOutcome::Abandoned => println!("abandoned"),
            }
        }
        "cancel" => {
            let invitation = parse_id(args.get(1), "invitation id")?;
            let comment = args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();
            dashboard.cancel(invitation, &comment).await?;
            println!("cancelled #{}", invitation);
        }
        "reactivate" => {
            let invitation = parse_id(args.get(1), "invitation id")?;
            let comment = args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();
            dashboard.reactivate(invitation, &comment).await?;
            println!("reactivated #{}", invitation);
        }
        "delete" => {
            let invitation = parse_id(args.get(1), "invitation id")?;
            dashboard.delete_invitation(invitation).await?;
            println!("deleted #{}", invitation);
        }
        "person-add" => {
            let payload = PersonPayload {
                id: None,
                name: args.get(1).cloned().ok_or_else(usage)?,
                title: args.get(2).cloned().ok_or_else(usage)?,
                phone: args.get(3).cloned().unwrap_or_default(),
                email: args.get(4).cloned().unwrap_or_default(),
                unit: args.get(5).cloned().unwrap_or_default(),
            };
            let id = dashboard.create_person(&payload).await?;
            println!("created person #{}", id);
        }
        "person-del" => {
            let person = parse_id(args.get(1), "person id")?;
            let released = dashboard.delete_person(person).await?;
            println!("deleted person #{}, {} invitations back to pending", person, released);
        }
        "stats" => {
            let from = args.get(1).and_then(|v| parse_date_flexible(v));
            let to = args.get(2).and_then(|v| parse_date_flexible(v));
            let counts = dashboard.stats(from, to).await?;
            println!("pending     {}", counts.pending);
            println!("confirmed   {}", counts.confirmed);
            println!("substituted {}", counts.substituted);
            println!("cancelled   {}", counts.cancelled);
        }
        "export" => {
            let path = args.get(1).ok_or_else(usage)?;
            let bytes = dashboard.export_confirmed_report().await?;
            std::fs::write(path, &bytes)
                .map_err(|e| AppError::validation(format!("cannot write {}: {}", path, e)))?;
            println!("wrote {} bytes to {}", bytes.len(), path);
        }
        "health" => {
            let ok = dashboard.client().health().await?;
            println!("backend ok: {}", ok);
        }
        _ => return Err(usage()),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        error!("{}", err);
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
