use qradar_api::{QRadarClient, SourceAddress};
use tabled::Tabled;

use crate::cli::{GlobalOpts, SourceAddressesArgs, SourceAddressesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SourceAddressRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Source IP")]
    source_ip: String,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Mag")]
    magnitude: i64,
    #[tabled(rename = "Events/Flows")]
    event_flow_count: i64,
    #[tabled(rename = "First seen")]
    first_seen: String,
    #[tabled(rename = "Last seen")]
    last_seen: String,
    #[tabled(rename = "Offenses")]
    offenses: String,
}

impl From<&SourceAddress> for SourceAddressRow {
    fn from(s: &SourceAddress) -> Self {
        Self {
            id: s.id,
            source_ip: s.source_ip.clone(),
            network: s.network.clone(),
            magnitude: s.magnitude,
            event_flow_count: s.event_flow_count,
            first_seen: output::format_millis(s.first_event_flow_seen),
            last_seen: output::format_millis(s.last_event_flow_seen),
            offenses: s
                .offense_ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}

pub async fn handle(
    client: &QRadarClient,
    args: SourceAddressesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SourceAddressesCommand::List { fields, filter } => {
            let addresses = client
                .list_source_addresses(
                    fields.as_deref().unwrap_or_default(),
                    filter.as_deref().unwrap_or_default(),
                )
                .await?;
            let out = output::render_list(
                global.output_format(),
                &addresses,
                |s| SourceAddressRow::from(s),
                |s| s.source_ip.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
