//! Offense command handlers.

use owo_colors::OwoColorize;
use qradar_api::{Offense, OffenseQuery, OffenseUpdate, QRadarClient};
use tabled::Tabled;

use crate::cli::{GlobalOpts, OffensesArgs, OffensesCommand};
use crate::error::CliError;
use crate::output::{self, show, show_time};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct OffenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Sev")]
    severity: String,
    #[tabled(rename = "Mag")]
    magnitude: String,
    #[tabled(rename = "Events")]
    events: String,
    #[tabled(rename = "Assigned")]
    assigned_to: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Offense> for OffenseRow {
    fn from(o: &Offense) -> Self {
        Self {
            id: show(&o.id),
            status: show(&o.status),
            severity: show(&o.severity),
            magnitude: show(&o.magnitude),
            events: show(&o.event_count),
            assigned_to: show(&o.assigned_to),
            started: show_time(&o.start_time),
            description: first_line(&o.description),
        }
    }
}

/// Descriptions often carry a trailing newline and several lines.
fn first_line(description: &qradar_api::Field<String>) -> String {
    description
        .value()
        .and_then(|d| d.lines().next())
        .map_or_else(|| "-".into(), |l| l.trim().to_owned())
}

fn detail(o: &Offense, color: bool) -> String {
    let status = show(&o.status);
    let status = match (color, o.status.value().map(String::as_str)) {
        (true, Some("OPEN")) => status.red().to_string(),
        (true, Some("CLOSED")) => status.green().to_string(),
        (true, Some("HIDDEN")) => status.dimmed().to_string(),
        _ => status,
    };

    let mut lines = vec![
        format!("ID:           {}", show(&o.id)),
        format!("Description:  {}", first_line(&o.description)),
        format!("Status:       {status}"),
        format!(
            "Severity:     {}  Credibility: {}  Relevance: {}  Magnitude: {}",
            show(&o.severity),
            show(&o.credibility),
            show(&o.relevance),
            show(&o.magnitude)
        ),
        format!("Source:       {}", show(&o.offense_source)),
        format!("Network:      {}", show(&o.source_network)),
        format!("Events:       {}", show(&o.event_count)),
        format!("Flows:        {}", show(&o.flow_count)),
        format!("Started:      {}", show_time(&o.start_time)),
        format!("Updated:      {}", show_time(&o.last_updated_time)),
        format!("Assigned to:  {}", show(&o.assigned_to)),
        format!("Follow-up:    {}", show(&o.follow_up)),
        format!("Protected:    {}", show(&o.protected)),
    ];
    if o.close_time.is_present() {
        lines.push(format!("Closed:       {}", show_time(&o.close_time)));
        lines.push(format!("Closed by:    {}", show(&o.closing_user)));
        lines.push(format!("Reason ID:    {}", show(&o.closing_reason_id)));
    }
    if let Some(categories) = o.categories.value() {
        lines.push(format!("Categories:   {}", categories.join(", ")));
    }
    if let Some(networks) = o.destination_networks.value() {
        lines.push(format!("Dest nets:    {}", networks.join(", ")));
    }
    if let Some(rules) = o.rules.value() {
        let ids: Vec<String> = rules.iter().map(|r| show(&r.id)).collect();
        lines.push(format!("Rules:        {}", ids.join(", ")));
    }
    if let Some(sources) = o.log_sources.value() {
        let names: Vec<String> = sources.iter().map(|s| show(&s.name)).collect();
        lines.push(format!("Log sources:  {}", names.join(", ")));
    }
    lines.join("\n")
}

fn id_of(o: &Offense) -> String {
    show(&o.id)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &QRadarClient,
    args: OffensesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        OffensesCommand::List {
            fields,
            filter,
            range,
        } => {
            let query = OffenseQuery {
                fields: fields.unwrap_or_default(),
                filter: filter.unwrap_or_default(),
                range: range.unwrap_or_default(),
            };
            let offenses = client.list_offenses(&query).await?;
            let out = output::render_list(
                global.output_format(),
                &offenses,
                |o| OffenseRow::from(o),
                id_of,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OffensesCommand::Get { id, fields } => {
            let offense = client
                .get_offense(id, fields.as_deref().unwrap_or_default())
                .await
                .map_err(|e| CliError::from_api(e, "offense", &id.to_string()))?;
            let out = output::render_single(
                global.output_format(),
                &offense,
                |o| detail(o, color),
                id_of,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OffensesCommand::Update {
            id,
            status,
            assigned_to,
            unassign,
            closing_reason_id,
            follow_up,
            protected,
            fields,
        } => {
            let mut update = OffenseUpdate::new();
            if let Some(s) = status {
                update = update.status(s);
            }
            if let Some(user) = assigned_to {
                update = update.assigned_to(user);
            }
            if unassign {
                update = update.unassign();
            }
            if let Some(reason) = closing_reason_id {
                update = update.closing_reason_id(reason);
            }
            if let Some(v) = follow_up {
                update = update.follow_up(v);
            }
            if let Some(v) = protected {
                update = update.protected(v);
            }
            if update.is_empty() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass at least one of --status, \
                             --assigned-to, --unassign, --closing-reason-id, \
                             --follow-up, --protected"
                        .into(),
                });
            }

            let offense = client
                .update_offense(id, fields.as_deref().unwrap_or_default(), &update)
                .await
                .map_err(|e| CliError::from_api(e, "offense", &id.to_string()))?;
            let out = output::render_single(
                global.output_format(),
                &offense,
                |o| detail(o, color),
                id_of,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
