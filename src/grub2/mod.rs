//! GRUB2 configuration models.
//!
//! - `param_tree` / `kernel_params` - kernel command line editing
//! - `grub_cfg` - boot menu reconstruction from the generated `grub.cfg`
//! - `default` - `/etc/default/grub`
//! - `device_map` - `/boot/grub2/device.map`
//! - `install_device` - `/etc/default/grub_installdevice`

pub mod default;
pub mod device_map;
pub mod grub_cfg;
pub mod install_device;
pub mod kernel_params;
pub mod param_tree;

pub use default::{Attribute, GrubDefault, Terminal, Toggle};
pub use device_map::DeviceMap;
pub use grub_cfg::{BootEntry, GrubCfg, MenuParser};
pub use install_device::InstallDevice;
pub use kernel_params::{CmdlineKey, KernelParams};
pub use param_tree::{Operation, ParamTree, ParamValue, Parameter, ParameterRecord};
