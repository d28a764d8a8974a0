//! Param command - edits kernel command lines in /etc/default/grub.

use anyhow::Result;

use super::open_default;
use grub2cfg::cfa::{Matcher, Placer};
use grub2cfg::config::Config;
use grub2cfg::grub2::param_tree::split_token;
use grub2cfg::grub2::{CmdlineKey, ParamValue, Parameter};

/// Where `param add` puts the new parameter.
pub enum Placement {
    Append,
    Before(String),
    After(String),
    Replace(String),
}

impl Placement {
    fn placer(&self) -> Placer {
        match self {
            Placement::Append => Placer::Append,
            Placement::Before(selector) => Placer::Before(Matcher::from_selector(selector)),
            Placement::After(selector) => Placer::After(Matcher::from_selector(selector)),
            Placement::Replace(selector) => Placer::Replace(Matcher::from_selector(selector)),
        }
    }
}

/// Action for the param command.
pub enum ParamAction {
    /// Print the whole command line, one parameter per line
    List,
    /// Print the value(s) of one parameter
    Get { key: String },
    /// Add `KEY` or `KEY=VALUE`
    Add { token: String, placement: Placement },
    /// Remove parameters matching `KEY` or `KEY=VALUE`
    Remove { selector: String },
}

/// Execute the param command.
pub fn cmd_param(config: &Config, key: CmdlineKey, action: ParamAction) -> Result<()> {
    let mut grub_default = open_default(config)?;

    match action {
        ParamAction::List => {
            let params = grub_default.cmdline(key);
            println!("{}:", key);
            for record in params.tree().data() {
                match record.value() {
                    ParamValue::Flag => println!("  {}", record.key()),
                    ParamValue::Value(v) => println!("  {}={}", record.key(), v),
                }
            }
        }
        ParamAction::Get { key: name } => match grub_default.cmdline(key).parameter(&name) {
            Parameter::Missing => println!("{} is not set", name),
            Parameter::Flag => println!("{}", name),
            Parameter::Value(value) => println!("{}={}", name, value),
            Parameter::Multiple(values) => {
                for value in values {
                    match value {
                        ParamValue::Flag => println!("{}", name),
                        ParamValue::Value(v) => println!("{}={}", name, v),
                    }
                }
            }
        },
        ParamAction::Add { token, placement } => {
            let (name, value) = split_token(&token);
            let params = grub_default.cmdline(key);
            params.add_parameter(name, value, &placement.placer());
            let line = params.serialize();
            grub_default.save()?;
            println!("✓ {}=\"{}\"", key, line);
        }
        ParamAction::Remove { selector } => {
            let params = grub_default.cmdline(key);
            let removed = params.remove_parameter(&Matcher::from_selector(&selector));
            if removed == 0 {
                println!("  Nothing matched '{}', {} unchanged", selector, key);
                return Ok(());
            }
            let line = params.serialize();
            grub_default.save()?;
            println!("✓ Removed {} parameter(s)", removed);
            println!("  {}=\"{}\"", key, line);
        }
    }
    Ok(())
}
