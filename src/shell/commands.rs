//! Built-in commands.

use super::registry::{Command, CommandResult, Context, ExitStatus};
use crate::num::{Parsed, parse_u64};

/// Bytes shown per `hexdump` row.
pub const HEXDUMP_ROW: usize = 16;

/// Commands every shell starts with, in `help` order.
pub const BUILTINS: &[Command] = &[
    Command::new("help", "list the available commands", help),
    Command::new("echo", "print each of its arguments", echo),
    Command::new("hexdump", "dump memory starting at ARG1 for ARG2 bytes", hexdump),
];

/// List every registered command with its description.
pub fn help(ctx: &mut Context<'_>, argc: usize, argv: &[&str]) -> CommandResult {
    if argc > 1 {
        let name = argv.first().copied().unwrap_or_default();
        printf!(ctx.out, "Error: \"%s\" does not expect arguments.\n", name)?;
        return Ok(ExitStatus::FAILURE);
    }

    let commands = ctx.registry;
    printf!(ctx.out, "List of available commands:\n")?;
    for command in commands {
        printf!(ctx.out, "- \"%s\": %s.\n", command.name, command.description)?;
    }
    Ok(ExitStatus::SUCCESS)
}

/// Print each argument on its own line.
pub fn echo(ctx: &mut Context<'_>, argc: usize, argv: &[&str]) -> CommandResult {
    for arg in argv.iter().take(argc).skip(1) {
        printf!(ctx.out, "%s\n", *arg)?;
    }
    Ok(ExitStatus::SUCCESS)
}

/// Dump `size` bytes of memory starting at `address`.
///
/// The address is decimal or `0x`-prefixed hex, the size is decimal. Each row
/// shows its address, up to 16 bytes in hex grouped in pairs, and the
/// printable ASCII rendering of those bytes.
pub fn hexdump(ctx: &mut Context<'_>, argc: usize, argv: &[&str]) -> CommandResult {
    if argc != 3 || argv.len() != 3 {
        let name = argv.first().copied().unwrap_or_default();
        printf!(ctx.out, "Error: \"%s\" expects two integer arguments.\n", name)?;
        return Ok(ExitStatus::FAILURE);
    }

    let Some(address) = parse_address(argv[1]) else {
        printf!(ctx.out, "Error: ARG1 should be a decimal or hex address.\n")?;
        return Ok(ExitStatus::FAILURE);
    };
    let Some(size) = parse_u64(argv[2], 10).ok().and_then(Parsed::complete) else {
        printf!(ctx.out, "Error: ARG2 should be a base 10 size.\n")?;
        return Ok(ExitStatus::FAILURE);
    };
    if size > 0 && address.checked_add(size - 1).is_none() {
        printf!(ctx.out, "Error: range overflows the address space.\n")?;
        return Ok(ExitStatus::FAILURE);
    }

    let mut offset = 0;
    while offset < size {
        let row_address = address + offset;
        let count = (size - offset).min(HEXDUMP_ROW as u64) as usize;

        let mut row = [0u8; HEXDUMP_ROW];
        for (i, slot) in row[..count].iter_mut().enumerate() {
            let byte_address = row_address + i as u64;
            match ctx.memory.read_byte(byte_address) {
                Ok(byte) => *slot = byte,
                Err(_) => {
                    printf!(ctx.out, "Error: cannot read memory at 0x%w.\n", byte_address)?;
                    return Ok(ExitStatus::FAILURE);
                }
            }
        }

        printf!(ctx.out, "%w: ", row_address)?;
        for (column, byte) in row.iter().enumerate() {
            if column < count {
                printf!(ctx.out, "%b", *byte)?;
            } else {
                printf!(ctx.out, "  ")?;
            }
            if column % 2 == 1 {
                printf!(ctx.out, " ")?;
            }
        }
        printf!(ctx.out, " ")?;
        for &byte in &row[..count] {
            let shown = if (0x20..=0x7e).contains(&byte) { byte as char } else { '.' };
            printf!(ctx.out, "%c", shown)?;
        }
        printf!(ctx.out, "\n")?;

        offset += count as u64;
    }
    Ok(ExitStatus::SUCCESS)
}

fn parse_address(text: &str) -> Option<u64> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => parse_u64(hex, 16),
        None => parse_u64(text, 10),
    };
    parsed.ok().and_then(Parsed::complete)
}
