use crate::cli::{parse_secret_name, CliContext};
use crate::store::file::FileStore;
use crate::store::logged::Logged;
use crate::store::{Deadline, Resource, ResourceStore};
use anyhow::{anyhow, Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Secret name
    #[arg(value_parser = parse_secret_name)]
    pub name: String,
}

pub fn run(ctx: &CliContext, args: DescribeArgs) -> Result<()> {
    let store = Logged::new(FileStore::new(ctx.paths.clone()));
    let resource = store
        .get(&ctx.namespace, &args.name, Deadline::after(ctx.timeout))
        .with_context(|| format!("lookup secret '{}/{}'", ctx.namespace, args.name))?
        .ok_or_else(|| {
            anyhow!(
                "secret '{}' not found in '{}' namespace ({})",
                args.name,
                ctx.namespace,
                ctx.paths
            )
        })?;

    print!("{}", render(&resource));
    Ok(())
}

/// Metadata lines plus a table of payload keys and sizes. Values are never shown.
fn render(resource: &Resource) -> String {
    let meta = &resource.metadata;
    let mut out = String::new();
    out.push_str(&format!("name: {}\n", meta.name));
    out.push_str(&format!("namespace: {}\n", meta.namespace));
    if let Some(uid) = &meta.uid {
        out.push_str(&format!("uid: {}\n", uid));
    }
    if let Some(version) = meta.resource_version {
        out.push_str(&format!("resource_version: {}\n", version));
    }
    if let Some(created) = meta.creation_timestamp {
        out.push_str(&format!("created_at: {}\n", created.to_rfc3339()));
    }
    if !meta.labels.is_empty() {
        let labels: Vec<String> = meta
            .labels
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        out.push_str(&format!("labels: {}\n", labels.join(",")));
    }

    if resource.data.is_empty() {
        out.push_str("data: (empty)\n");
        return out;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Size").add_attribute(Attribute::Bold),
    ]);
    for (key, value) in &resource.data {
        table.add_row(vec![key.clone(), format!("{} B", value.len())]);
    }
    out.push_str(&format!("{}\n", table));
    out
}
