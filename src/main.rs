//! grub2cfg - GRUB2 configuration editor.
//!
//! Reads and edits the files GRUB2 is configured through:
//! - /etc/default/grub (settings and kernel command lines)
//! - /boot/grub2/grub.cfg (boot menu, read-only)
//! - /boot/grub2/device.map and /etc/default/grub_installdevice

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use grub2cfg::config::Config;
use grub2cfg::grub2::{Attribute, CmdlineKey, Toggle};

#[derive(Parser)]
#[command(name = "grub2cfg")]
#[command(about = "GRUB2 configuration editor")]
#[command(
    after_help = "QUICK START:\n  grub2cfg entries            List boot entries with their full paths\n  grub2cfg show settings      Show /etc/default/grub\n  grub2cfg param add quiet    Add a kernel parameter\n  grub2cfg --root /mnt ...    Edit a mounted target system"
)]
struct Cli {
    /// Root of the system to edit (overrides GRUB2CFG_ROOT)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List boot entries from grub.cfg
    Entries {
        /// Print as JSON
        #[arg(long)]
        json: bool,
        /// Print titles only, without submenu paths
        #[arg(long)]
        titles: bool,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },

    /// Print a setting from /etc/default/grub
    Get { attribute: AttributeArg },

    /// Change a setting in /etc/default/grub
    Set { attribute: AttributeArg, value: String },

    /// Enable or disable a boolean setting
    Toggle { setting: ToggleArg, state: State },

    /// Show or set GRUB_TERMINAL (serial, console, gfxterm)
    Terminal { names: Vec<String> },

    /// Show or set GRUB_SERIAL_COMMAND (also enables the serial terminal)
    SerialConsole { command: Option<String> },

    /// Edit a kernel command line
    Param {
        /// Command line to edit
        #[arg(long, value_enum, default_value = "linux-default", global = true)]
        cmdline: CmdlineArg,

        #[command(subcommand)]
        action: ParamAction,
    },

    /// Edit /etc/default/grub_installdevice
    InstallDevice {
        #[command(subcommand)]
        action: Option<InstallDeviceAction>,
    },

    /// Edit /boot/grub2/device.map
    DeviceMap {
        #[command(subcommand)]
        action: Option<DeviceMapAction>,
    },
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Show /etc/default/grub settings
    Settings,
}

#[derive(Subcommand)]
enum ParamAction {
    /// List parameters
    List,
    /// Print the value(s) of a parameter
    Get { key: String },
    /// Add KEY or KEY=VALUE (appended unless a position is given)
    Add {
        token: String,
        /// Insert after the first parameter matching KEY or KEY=VALUE
        #[arg(long, conflicts_with_all = ["before", "replace"])]
        after: Option<String>,
        /// Insert before the first parameter matching KEY or KEY=VALUE
        #[arg(long, conflicts_with = "replace")]
        before: Option<String>,
        /// Replace the first parameter matching KEY or KEY=VALUE
        #[arg(long)]
        replace: Option<String>,
    },
    /// Remove every parameter matching KEY or KEY=VALUE
    Remove { selector: String },
}

#[derive(Subcommand)]
enum InstallDeviceAction {
    /// List install devices and flags
    List,
    /// Add a device
    Add { device: String },
    /// Remove a device
    Remove { device: String },
    /// Set the generic_mbr flag
    GenericMbr { state: State },
    /// Set the activate flag
    Activate { state: State },
}

#[derive(Subcommand)]
enum DeviceMapAction {
    /// List mappings
    List,
    /// Map a GRUB drive such as (hd0) to a system device
    Add { grub_device: String, system_device: String },
    /// Remove the mapping of a GRUB drive
    Remove { grub_device: String },
    /// Print the GRUB drive mapped to a system device
    Lookup { system_device: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum AttributeArg {
    Default,
    Distributor,
    Gfxmode,
    HiddenTimeout,
    Theme,
    Timeout,
}

#[derive(Clone, Copy, ValueEnum)]
enum ToggleArg {
    OsProber,
    Recovery,
    Savedefault,
    Cryptodisk,
}

#[derive(Clone, Copy, ValueEnum)]
enum CmdlineArg {
    LinuxDefault,
    Linux,
    XenDefault,
    XenReplaceDefault,
    Recovery,
}

#[derive(Clone, Copy, ValueEnum)]
enum State {
    On,
    Off,
}

impl From<AttributeArg> for Attribute {
    fn from(arg: AttributeArg) -> Self {
        match arg {
            AttributeArg::Default => Attribute::Default,
            AttributeArg::Distributor => Attribute::Distributor,
            AttributeArg::Gfxmode => Attribute::Gfxmode,
            AttributeArg::HiddenTimeout => Attribute::HiddenTimeout,
            AttributeArg::Theme => Attribute::Theme,
            AttributeArg::Timeout => Attribute::Timeout,
        }
    }
}

impl From<ToggleArg> for Toggle {
    fn from(arg: ToggleArg) -> Self {
        match arg {
            ToggleArg::OsProber => Toggle::OsProber,
            ToggleArg::Recovery => Toggle::RecoveryEntry,
            ToggleArg::Savedefault => Toggle::SaveDefault,
            ToggleArg::Cryptodisk => Toggle::Cryptodisk,
        }
    }
}

impl From<CmdlineArg> for CmdlineKey {
    fn from(arg: CmdlineArg) -> Self {
        match arg {
            CmdlineArg::LinuxDefault => CmdlineKey::LinuxDefault,
            CmdlineArg::Linux => CmdlineKey::Linux,
            CmdlineArg::XenDefault => CmdlineKey::XenDefault,
            CmdlineArg::XenReplaceDefault => CmdlineKey::XenReplaceDefault,
            CmdlineArg::Recovery => CmdlineKey::Recovery,
        }
    }
}

impl State {
    fn enabled(self) -> bool {
        matches!(self, State::On)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base_dir = std::env::current_dir()?;
    let config = Config::load(&base_dir, cli.root.as_deref())?;

    match cli.command {
        Commands::Entries { json, titles } => {
            commands::cmd_entries(&config, json, titles)?;
        }

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Settings => commands::show::ShowTarget::Settings,
            };
            commands::cmd_show(&config, show_target)?;
        }

        Commands::Get { attribute } => {
            commands::cmd_get(&config, attribute.into())?;
        }

        Commands::Set { attribute, value } => {
            commands::cmd_set(&config, attribute.into(), &value)?;
        }

        Commands::Toggle { setting, state } => {
            commands::cmd_toggle(&config, setting.into(), state.enabled())?;
        }

        Commands::Terminal { names } => {
            commands::cmd_terminal(&config, &names)?;
        }

        Commands::SerialConsole { command } => {
            commands::cmd_serial_console(&config, command.as_deref())?;
        }

        Commands::Param { cmdline, action } => {
            use commands::params::Placement;
            let param_action = match action {
                ParamAction::List => commands::params::ParamAction::List,
                ParamAction::Get { key } => commands::params::ParamAction::Get { key },
                ParamAction::Add {
                    token,
                    after,
                    before,
                    replace,
                } => {
                    let placement = match (after, before, replace) {
                        (Some(selector), _, _) => Placement::After(selector),
                        (_, Some(selector), _) => Placement::Before(selector),
                        (_, _, Some(selector)) => Placement::Replace(selector),
                        _ => Placement::Append,
                    };
                    commands::params::ParamAction::Add { token, placement }
                }
                ParamAction::Remove { selector } => {
                    commands::params::ParamAction::Remove { selector }
                }
            };
            commands::cmd_param(&config, cmdline.into(), param_action)?;
        }

        Commands::InstallDevice { action } => {
            let device_action = match action {
                None | Some(InstallDeviceAction::List) => {
                    commands::devices::InstallDeviceAction::List
                }
                Some(InstallDeviceAction::Add { device }) => {
                    commands::devices::InstallDeviceAction::Add(device)
                }
                Some(InstallDeviceAction::Remove { device }) => {
                    commands::devices::InstallDeviceAction::Remove(device)
                }
                Some(InstallDeviceAction::GenericMbr { state }) => {
                    commands::devices::InstallDeviceAction::GenericMbr(state.enabled())
                }
                Some(InstallDeviceAction::Activate { state }) => {
                    commands::devices::InstallDeviceAction::Activate(state.enabled())
                }
            };
            commands::cmd_install_device(&config, device_action)?;
        }

        Commands::DeviceMap { action } => {
            let map_action = match action {
                None | Some(DeviceMapAction::List) => commands::devices::DeviceMapAction::List,
                Some(DeviceMapAction::Add {
                    grub_device,
                    system_device,
                }) => commands::devices::DeviceMapAction::Add {
                    grub_device,
                    system_device,
                },
                Some(DeviceMapAction::Remove { grub_device }) => {
                    commands::devices::DeviceMapAction::Remove(grub_device)
                }
                Some(DeviceMapAction::Lookup { system_device }) => {
                    commands::devices::DeviceMapAction::Lookup(system_device)
                }
            };
            commands::cmd_device_map(&config, map_action)?;
        }
    }

    Ok(())
}
