use anyhow::{anyhow, bail};
use clap::Subcommand;
use serde_json::json;

use crate::cli::config::ClientSettings;
use crate::cli::utils::{output_collection, output_effects, output_error, output_success};
use crate::cli::OutputFormat;
use crate::client::{load_form_context, GroupApi, GroupForm, HttpGroupApi, Outcome};
use crate::database::models::Member;

#[derive(Subcommand)]
pub enum GroupCommands {
    #[command(about = "List all groups")]
    List,

    #[command(about = "Show a group with its members")]
    Show {
        #[arg(help = "Group id")]
        id: String,
    },

    #[command(about = "Create a group")]
    Create {
        #[arg(long, help = "Group name")]
        name: String,
        #[arg(long, help = "Program id")]
        program: String,
        #[arg(long, help = "Location id")]
        location: String,
        #[arg(long = "member", help = "Member id or exact name (repeatable)")]
        members: Vec<String>,
    },

    #[command(about = "Edit a group's name, program or location")]
    Update {
        #[arg(help = "Group id")]
        id: String,
        #[arg(long, help = "New name")]
        name: Option<String>,
        #[arg(long, help = "New program id")]
        program: Option<String>,
        #[arg(long, help = "New location id")]
        location: Option<String>,
    },

    #[command(about = "Delete a group")]
    Delete {
        #[arg(help = "Group id")]
        id: String,
        #[arg(long, help = "Confirm the deletion")]
        yes: bool,
    },
}

pub async fn handle(cmd: GroupCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let api = ClientSettings::from_env().api()?;

    match cmd {
        GroupCommands::List => {
            let groups = api.list_groups().await?;
            output_collection(&output_format, "groups", &groups, |g| format!("{}  {}", g.id, g.name))
        }
        GroupCommands::Show { id } => show(&api, &id, output_format).await,
        GroupCommands::Create {
            name,
            program,
            location,
            members,
        } => create(api, name, program, location, members, output_format).await,
        GroupCommands::Update {
            id,
            name,
            program,
            location,
        } => update(api, &id, name, program, location, output_format).await,
        GroupCommands::Delete { id, yes } => delete(api, &id, yes, output_format).await,
    }
}

async fn show(api: &HttpGroupApi, id: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let context = load_form_context(api, Some(id)).await?;
    let group = context.group.ok_or_else(|| anyhow!("Group '{}' not found", id))?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&group)?),
        OutputFormat::Text => {
            let program = context
                .programs
                .iter()
                .find(|p| p.id == group.group.program_id)
                .map(|p| p.name.as_str())
                .unwrap_or("?");
            let location = context
                .locations
                .iter()
                .find(|l| l.id == group.group.location_id)
                .map(|l| l.name.as_str())
                .unwrap_or("?");

            println!("{}  {}", group.group.id, group.group.name);
            println!("  program:  {} ({})", program, group.group.program_id);
            println!("  location: {} ({})", location, group.group.location_id);
            println!("  members:  {}", group.members.len());
            for member in &group.members {
                println!("    {}  {}", member.id, member.name);
            }
        }
    }
    Ok(())
}

async fn create(
    api: HttpGroupApi,
    name: String,
    program: String,
    location: String,
    members: Vec<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let mut form = GroupForm::new(api, None);
    form.set_name(name);
    form.set_program(program);
    form.set_location(location);

    if !members.is_empty() {
        form.load_members().await;
        let effects = form.take_effects();
        if !effects.is_empty() {
            output_effects(&output_format, effects, None)?;
            bail!("Could not load members");
        }

        for key in &members {
            let id = resolve_member(form.members(), key)?.to_string();
            if !form.add_member(&id) {
                tracing::warn!("Member '{}' listed more than once", key);
            }
        }
    }

    let values = json!({ "name": form.values().name, "members": form.values().members });
    let outcome = form.submit().await;
    finish(&mut form, outcome, Some(values), &output_format)
}

async fn update(
    api: HttpGroupApi,
    id: &str,
    name: Option<String>,
    program: Option<String>,
    location: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let initial = api.get_group(id).await?;
    let mut form = GroupForm::new(api, Some(initial));

    if let Some(name) = name {
        form.set_name(name);
    }
    if let Some(program) = program {
        form.set_program(program);
    }
    if let Some(location) = location {
        form.set_location(location);
    }

    let outcome = form.submit().await;
    finish(&mut form, outcome, None, &output_format)
}

async fn delete(api: HttpGroupApi, id: &str, yes: bool, output_format: OutputFormat) -> anyhow::Result<()> {
    let initial = match api.get_group(id).await {
        Ok(group) => group,
        Err(e) if e.status() == Some(404) => {
            return output_success(&output_format, "Nothing to delete", Some(json!({ "count": 0 })));
        }
        Err(e) => return Err(e.into()),
    };

    let mut form = GroupForm::new(api, Some(initial));
    if !form.request_delete() {
        bail!("Group cannot be deleted right now");
    }
    if !yes {
        form.cancel_delete();
        bail!("Deleting '{}' cannot be undone; pass --yes to confirm", id);
    }

    let outcome = form.confirm_delete().await;
    finish(&mut form, outcome, None, &output_format)
}

fn finish<A: GroupApi>(
    form: &mut GroupForm<A>,
    outcome: Outcome,
    data: Option<serde_json::Value>,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    output_effects(output_format, form.take_effects(), data)?;

    match outcome {
        Outcome::Done => Ok(()),
        Outcome::Invalid(errors) => {
            for (field, message) in &errors {
                output_error(output_format, &format!("{}: {}", field, message))?;
            }
            bail!("Validation failed")
        }
        Outcome::Refused => bail!("Form is busy"),
        Outcome::Failed => bail!("Request failed"),
    }
}

/// Match a `--member` argument by id first, then by case-insensitive name.
/// A name shared by several members is ambiguous and must be given as an id.
fn resolve_member<'a>(members: &'a [Member], key: &str) -> anyhow::Result<&'a str> {
    if let Some(member) = members.iter().find(|m| m.id == key) {
        return Ok(&member.id);
    }

    let needle = key.trim().to_lowercase();
    let mut by_name = members.iter().filter(|m| m.name.to_lowercase() == needle);
    match (by_name.next(), by_name.next()) {
        (Some(member), None) => Ok(&member.id),
        (Some(_), Some(_)) => bail!("Member name '{}' is ambiguous; use the id", key),
        (None, _) => bail!("Unknown member '{}'", key),
    }
}
