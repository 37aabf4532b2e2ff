use clap::Subcommand;

use crate::cli::config::ClientSettings;
use crate::cli::utils::output_collection;
use crate::cli::OutputFormat;
use crate::client::GroupApi;

#[derive(Subcommand)]
pub enum LookupCommands {
    #[command(about = "List all records")]
    List,
}

#[derive(Debug, Clone, Copy)]
pub enum Lookup {
    Members,
    Programs,
    Locations,
}

pub async fn handle(lookup: Lookup, cmd: LookupCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let api = ClientSettings::from_env().api()?;

    match cmd {
        LookupCommands::List => match lookup {
            Lookup::Members => {
                let rows = api.list_members().await?;
                output_collection(&output_format, "members", &rows, |m| format!("{}  {}", m.id, m.name))
            }
            Lookup::Programs => {
                let rows = api.list_programs().await?;
                output_collection(&output_format, "programs", &rows, |p| format!("{}  {}", p.id, p.name))
            }
            Lookup::Locations => {
                let rows = api.list_locations().await?;
                output_collection(&output_format, "locations", &rows, |l| format!("{}  {}", l.id, l.name))
            }
        },
    }
}
