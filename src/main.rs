use anyhow::{Context, Result};
use clap::Parser;
use disksim::config::{parse_zoning, AddressSpec, Policy, SimConfig, WindowSize};
use disksim::{report, simulate};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Disk Scheduling Simulator")]
struct Cli {
    /// Random seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,
    /// Request list (comma-separated), or -1 to generate one from --addr-desc
    #[arg(short = 'a', long, default_value = "-1", allow_hyphen_values = true)]
    addr: String,
    /// Generated requests as count,max,min; a max of -1 means the highest block
    #[arg(short = 'A', long, default_value = "5,-1,0", allow_hyphen_values = true)]
    addr_desc: String,
    /// Arm movement per tick
    #[arg(short = 'S', long, default_value_t = 1.0)]
    seek_speed: f64,
    /// Degrees of rotation per tick
    #[arg(short = 'R', long, default_value_t = 1.0)]
    rot_speed: f64,
    /// FIFO, SSTF, SATF or BSATF
    #[arg(short, long, default_value = "FIFO")]
    policy: String,
    /// Scheduling window, -1 for the whole queue
    #[arg(short = 'w', long, default_value_t = -1, allow_hyphen_values = true)]
    sched_window: i64,
    /// Skew (in sectors) per track of depth
    #[arg(short = 'o', long, default_value_t = 0, allow_hyphen_values = true)]
    skew_offset: i32,
    /// Sector angle of each track, outer to inner
    #[arg(short, long, default_value = "30,30,30")]
    zoning: String,
    /// Late request list, or -1 to generate one from --late-addr-desc
    #[arg(short = 'l', long, default_value = "-1", allow_hyphen_values = true)]
    late_addr: String,
    /// Generated late requests as count,max,min
    #[arg(short = 'L', long, default_value = "0,-1,0", allow_hyphen_values = true)]
    late_addr_desc: String,
    /// Show the answers
    #[arg(short, long)]
    compute: bool,
    /// Accepted for compatibility; there is no graphical display, so this implies --compute
    #[arg(short = 'G', long)]
    graphics: bool,
}

impl Cli {
    fn echo_options(&self) {
        println!("OPTIONS seed {}", self.seed);
        println!("OPTIONS addr {}", self.addr);
        println!("OPTIONS addrDesc {}", self.addr_desc);
        println!("OPTIONS seekSpeed {}", self.seek_speed);
        println!("OPTIONS rotateSpeed {}", self.rot_speed);
        println!("OPTIONS skew {}", self.skew_offset);
        println!("OPTIONS window {}", self.sched_window);
        println!("OPTIONS policy {}", self.policy);
        println!("OPTIONS compute {}", self.compute);
        println!("OPTIONS graphics {}", self.graphics);
        println!("OPTIONS zoning {}", self.zoning);
        println!("OPTIONS lateAddr {}", self.late_addr);
        println!("OPTIONS lateAddrDesc {}", self.late_addr_desc);
        println!();
    }

    fn show_answers(&self) -> bool {
        self.compute || self.graphics
    }

    fn config(&self) -> Result<SimConfig> {
        Ok(SimConfig {
            requests: AddressSpec::parse(&self.addr, &self.addr_desc).context("bad --addr/--addr-desc")?,
            late_requests: AddressSpec::parse(&self.late_addr, &self.late_addr_desc)
                .context("bad --late-addr/--late-addr-desc")?,
            policy: self.policy.parse::<Policy>()?,
            seek_speed: self.seek_speed,
            rotation_speed: self.rot_speed,
            skew: self.skew_offset,
            window: WindowSize::from_raw(self.sched_window)?,
            zoning: parse_zoning(&self.zoning)?,
            seed: self.seed,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.echo_options();
    let config = cli.config()?;
    if cli.graphics && !cli.compute {
        println!("\nWARNING: Graphics mode not supported (console only)\n");
        println!("Setting compute flag to True\n");
    }
    let report = simulate(&config)?;
    println!("{}", report::display(&report, cli.show_answers()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_tool() {
        let cli = Cli::parse_from(["disksim"]);
        let config = cli.config().unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn negative_values_are_accepted() {
        let cli = Cli::parse_from(["disksim", "-w", "-1", "-o", "-2", "-a", "8,11", "-p", "SATF", "-c"]);
        let config = cli.config().unwrap();
        assert_eq!(config.window, WindowSize::Unbounded);
        assert_eq!(config.skew, -2);
        assert_eq!(config.requests, AddressSpec::Explicit(vec![8, 11]));
        assert_eq!(config.policy, Policy::Satf);
        assert!(cli.compute);
    }

    #[test]
    fn graphics_flag_shows_the_answers() {
        let cli = Cli::parse_from(["disksim", "-G"]);
        assert!(cli.graphics);
        assert!(!cli.compute);
        assert!(cli.show_answers());
        assert!(!Cli::parse_from(["disksim"]).show_answers());
        assert!(cli.config().is_ok());
    }

    #[test]
    fn fatal_configuration_errors() {
        assert!(Cli::parse_from(["disksim", "-w", "0"]).config().is_err());
        assert!(Cli::parse_from(["disksim", "-p", "LOOK"]).config().is_err());
        assert!(Cli::parse_from(["disksim", "-z", "30,30"]).config().is_err());
        assert!(Cli::parse_from(["disksim", "-A", "5,-1"]).config().is_err());
    }
}
