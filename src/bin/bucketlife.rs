use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use bucketlife::{compile, FileStore, JsonError, LifecycleClient, Rule};

#[derive(Parser, Debug)]
#[command(author, version, about = "Read and edit bucket lifecycle policies", long_about = None)]
struct Args {
    /// Directory holding one subdirectory per bucket
    #[arg(long, env = "BUCKETLIFE_STORE", default_value = ".")]
    store: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the bucket's lifecycle rules
    Read {
        bucket: String,

        /// Print the policy as JSON instead of one text rule per line
        #[arg(short, long)]
        json: bool,
    },
    /// Add a rule, or merge it into the rule with the same id or prefix
    PutRule {
        bucket: String,

        /// Rule as JSON or in text form, e.g. "logs: expire logs/ 30d"
        rule: String,
    },
    /// Remove a rule by id
    RemoveRule {
        bucket: String,

        /// Rule id, or a rule as JSON or text whose id is used
        rule: String,
    },
    /// Remove the bucket's whole lifecycle policy
    RemovePolicy { bucket: String },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    info!("Using policy store at {}", args.store.display());
    let client = LifecycleClient::new(FileStore::new(args.store));

    match args.command {
        Command::Read { bucket, json } => {
            if json {
                let policy = client
                    .read_policy(&bucket)
                    .with_context(|| format!("failed to read policy for {bucket}"))?
                    .unwrap_or_default();
                println!("{}", policy.to_json_pretty()?);
            } else {
                let lines = client
                    .render_policy(&bucket)
                    .with_context(|| format!("failed to read policy for {bucket}"))?;
                for line in lines {
                    println!("{line}");
                }
            }
        }
        Command::PutRule { bucket, rule } => {
            let rule = rule_from_arg(&rule)?;
            client
                .put_rule(&bucket, rule)
                .with_context(|| format!("failed to put rule on {bucket}"))?;
        }
        Command::RemoveRule { bucket, rule } => {
            let id = rule_id(&rule);
            client
                .remove_rule(&bucket, &id)
                .with_context(|| format!("failed to remove rule {id} from {bucket}"))?;
        }
        Command::RemovePolicy { bucket } => {
            client
                .remove_policy(&bucket)
                .with_context(|| format!("failed to remove policy from {bucket}"))?;
        }
    }

    Ok(())
}

/// Read a put-rule argument as JSON, falling back to rule text only when
/// the argument is not JSON at all.
fn rule_from_arg(arg: &str) -> Result<Rule> {
    match Rule::from_json(arg) {
        Ok(rule) => Ok(rule),
        Err(JsonError::Decode(_)) => {
            compile(arg).context("rule is neither JSON nor valid rule text")
        }
        Err(err) => Err(err).context("rule JSON does not describe a lifecycle rule"),
    }
}

/// Resolve the id named by a remove-rule argument.
fn rule_id(arg: &str) -> String {
    if let Some(id) = Rule::from_json(arg).ok().and_then(|r| r.id) {
        return id;
    }
    match compile(arg) {
        Ok(rule) => rule.id.unwrap_or_else(|| arg.to_owned()),
        Err(_) => arg.to_owned(),
    }
}
