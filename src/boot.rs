//! Boot-time report.
//!
//! The entry stub captures the registers the bootloader left behind and the
//! exception levels before and after its own setup, then hands them over as
//! a [`BootInfo`]. [`report`] prints them once, followed by the kernel command
//! line found in the device tree.

use crate::dtb::{self, Fdt};
use crate::format;
use crate::serial::Write;

const BANNER: &str = "********************************************\n\
                      *              Hello, World!!              *\n\
                      ********************************************\n";

/// State captured at entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BootInfo {
    /// Device tree address from `x0`, if the bootloader passed one.
    pub dtb_address: Option<u64>,
    /// Initial `x1`.
    pub x1: u64,
    /// Initial `x2`.
    pub x2: u64,
    /// Initial `x3`.
    pub x3: u64,
    /// Address execution started at.
    pub entry_point: u64,
    /// Exception level at entry.
    pub initial_el: u8,
    /// Exception level after the entry stub.
    pub current_el: u8,
}

impl BootInfo {
    /// The device tree at [`dtb_address`](Self::dtb_address).
    ///
    /// # Safety
    ///
    /// Same contract as [`Fdt::from_raw`] for the recorded address.
    pub unsafe fn device_tree(&self) -> Option<Result<Fdt<'static>, dtb::Error>> {
        let address = usize::try_from(self.dtb_address?).ok()?;
        // SAFETY: forwarded to the caller.
        Some(unsafe { Fdt::from_raw(address as *const u8) })
    }
}

/// Print the banner, the entry state and the boot arguments found in `blob`.
///
/// `blob` is the device tree found at `info.dtb_address`, if any. A blob
/// without `/chosen/bootargs` prints no command line; a malformed one prints
/// the reason and the report carries on.
pub fn report<W: Write + ?Sized>(out: &mut W, info: &BootInfo, blob: Option<&[u8]>) -> Result<(), format::Error> {
    out.write_str(BANNER)?;
    printf!(out, "Initial value of x1:     0x%w.\n", info.x1)?;
    printf!(out, "Initial value of x2:     0x%w.\n", info.x2)?;
    printf!(out, "Initial value of x3:     0x%w.\n", info.x3)?;
    printf!(out, "Initial entry point:     0x%w.\n", info.entry_point)?;
    printf!(out, "Initial exception level: EL%i.\n", i32::from(info.initial_el))?;
    printf!(out, "Current exception level: EL%i.\n", i32::from(info.current_el))?;
    printf!(out, "Address of the DTB:      ")?;
    match info.dtb_address {
        Some(address) => {
            printf!(out, "0x%w.\n", address)?;
            if let Some(blob) = blob {
                print_bootargs(out, blob)?;
            }
        }
        None => printf!(out, "n/a\n")?,
    }
    printf!(out, "Entering the interactive mode.\n")
}

fn print_bootargs<W: Write + ?Sized>(out: &mut W, blob: &[u8]) -> Result<(), format::Error> {
    match dtb::find_bootarg(blob) {
        Ok(Some(cmdline)) => printf!(out, "cmdline = '%s'\n", cmdline),
        Ok(None) => {
            debug!("device tree has no /chosen/bootargs");
            Ok(())
        }
        Err(e) => {
            warn!("device tree rejected: {}", e);
            printf!(out, "Error: malformed device tree (%s).\n", e.message())
        }
    }
}
