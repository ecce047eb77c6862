use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;

use w65c816::{Cpu, RamBus, ONE_CYCLE};

/// Run a raw 65C816 memory image until a cycle budget is spent.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Raw memory image, loaded at $000000. Must include the bank-0
    /// vectors.
    image: PathBuf,
    /// Master-cycle budget.
    #[arg(long, default_value_t = 1_000_000)]
    cycles: u64,
    /// Override the reset vector with an explicit 24-bit entry point (hex).
    #[arg(long, value_parser = parse_hex)]
    entry: Option<u32>,
    /// Enable the idle-loop fast-forward optimization.
    #[arg(long)]
    shutdown: bool,
    /// Decode the 0xDB/0x42 speed-hack branch trampolines.
    #[arg(long)]
    speed_hacks: bool,
}

fn parse_hex(s: &str) -> Result<u32, std::num::ParseIntError> {
    let s = s.trim_start_matches("0x").trim_start_matches('$');
    u32::from_str_radix(s, 16)
}

fn load_image(bus: &mut RamBus, path: &Path) -> Result<usize> {
    let data =
        fs::read(path).wrap_err_with(|| format!("failed to read image {}", path.display()))?;
    bus.load(0, &data);
    Ok(data.len())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    pretty_env_logger::init();
    let args = Args::parse();

    let mut bus = RamBus::new(0x1000000);
    let len = load_image(&mut bus, &args.image)?;
    info!("loaded {} bytes from {}", len, args.image.display());

    let mut cpu = Cpu::new(bus);
    cpu.set_shutdown_enabled(args.shutdown);
    cpu.set_speed_hacks(args.speed_hacks);
    cpu.reset();
    if let Some(entry) = args.entry {
        cpu.set_pc_base(entry);
    }

    let used = cpu.step_until(args.cycles);
    info!(
        "executed {} master cycles ({} fast-access cycles)",
        used,
        used / ONE_CYCLE
    );
    println!("{}", cpu);
    if cpu.halted() {
        println!("halted (STP)");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_image_into_low_memory() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xEA, 0xEA, 0x42]).unwrap();
        let mut bus = RamBus::new(0x10000);
        let len = load_image(&mut bus, file.path()).unwrap();
        assert_eq!(len, 3);
        use w65c816::Bus;
        assert_eq!(bus.read(2), Some(0x42));
    }

    #[test]
    fn hex_entry_parses() {
        assert_eq!(parse_hex("0x8000").unwrap(), 0x8000);
        assert_eq!(parse_hex("8000").unwrap(), 0x8000);
        assert_eq!(parse_hex("$7E0000").unwrap(), 0x7E0000);
    }
}
